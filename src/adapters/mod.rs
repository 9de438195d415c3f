//! Concrete adapter implementations for ports.

pub mod csv_market_data;
pub mod csv_quote_adapter;
pub mod csv_signal_log;
pub mod file_config_adapter;
