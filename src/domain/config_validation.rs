//! Configuration validation.
//!
//! Every check runs before any computation; a violation here is fatal.

use crate::domain::error::HybridTraderError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveTime;

pub fn validate_engine_config(config: &dyn ConfigPort) -> Result<(), HybridTraderError> {
    validate_trading(config)?;
    validate_macro_thresholds(config)?;
    validate_macro_symbols(config)?;
    validate_allocation(config)?;
    validate_risk(config)?;
    validate_data(config)?;
    Ok(())
}

fn validate_trading(config: &dyn ConfigPort) -> Result<(), HybridTraderError> {
    if let Some(symbol) = config.get_string("trading", "symbol") {
        if symbol.trim().is_empty() {
            return Err(HybridTraderError::ConfigInvalid {
                section: "trading".to_string(),
                key: "symbol".to_string(),
                reason: "symbol must not be empty".to_string(),
            });
        }
    }

    let lookback = config.get_int("trading", "lookback_period", 20);
    if lookback < 2 {
        return Err(HybridTraderError::ConfigInvalid {
            section: "trading".to_string(),
            key: "lookback_period".to_string(),
            reason: "lookback_period must be at least 2".to_string(),
        });
    }

    let buy_threshold = config.get_double("trading", "zscore_buy_threshold", -2.0);
    if buy_threshold == 0.0 {
        return Err(HybridTraderError::ConfigInvalid {
            section: "trading".to_string(),
            key: "zscore_buy_threshold".to_string(),
            reason: "zscore_buy_threshold must be non-zero".to_string(),
        });
    }

    let capital_base = config.get_double("trading", "capital_base", 100_000.0);
    if capital_base <= 0.0 {
        return Err(HybridTraderError::ConfigInvalid {
            section: "trading".to_string(),
            key: "capital_base".to_string(),
            reason: "capital_base must be positive".to_string(),
        });
    }

    Ok(())
}

fn validate_macro_thresholds(config: &dyn ConfigPort) -> Result<(), HybridTraderError> {
    let bullish = config.get_int("macro_thresholds", "bullish", 3);
    let bearish = config.get_int("macro_thresholds", "bearish", -3);
    if bearish > bullish {
        return Err(HybridTraderError::ConfigInvalid {
            section: "macro_thresholds".to_string(),
            key: "bearish".to_string(),
            reason: format!("bearish threshold {bearish} must not exceed bullish {bullish}"),
        });
    }
    Ok(())
}

fn validate_macro_symbols(config: &dyn ConfigPort) -> Result<(), HybridTraderError> {
    for key in ["global_index", "fx_rate", "volatility_index"] {
        if let Some(symbol) = config.get_string("macro_symbols", key) {
            if symbol.trim().is_empty() {
                return Err(HybridTraderError::ConfigInvalid {
                    section: "macro_symbols".to_string(),
                    key: key.to_string(),
                    reason: "symbol must not be empty".to_string(),
                });
            }
        }
    }
    Ok(())
}

fn validate_allocation(config: &dyn ConfigPort) -> Result<(), HybridTraderError> {
    let high = config.get_double("allocation", "high", 80.0);
    let medium = config.get_double("allocation", "medium", 50.0);
    let low = config.get_double("allocation", "low", 20.0);

    for (key, value) in [("high", high), ("medium", medium), ("low", low)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(HybridTraderError::ConfigInvalid {
                section: "allocation".to_string(),
                key: key.to_string(),
                reason: format!("allocation tier must be in [0, 100], got {value}"),
            });
        }
    }

    if high < medium || medium < low {
        return Err(HybridTraderError::ConfigInvalid {
            section: "allocation".to_string(),
            key: "high".to_string(),
            reason: "allocation tiers must satisfy high >= medium >= low".to_string(),
        });
    }

    Ok(())
}

fn validate_risk(config: &dyn ConfigPort) -> Result<(), HybridTraderError> {
    let stop_loss_pct = config.get_double("risk", "stop_loss_pct", 1.0);
    if stop_loss_pct <= 0.0 {
        return Err(HybridTraderError::ConfigInvalid {
            section: "risk".to_string(),
            key: "stop_loss_pct".to_string(),
            reason: "stop_loss_pct must be positive".to_string(),
        });
    }

    let exit_time = config
        .get_string("risk", "exit_time")
        .unwrap_or_else(|| "15:15".to_string());
    if NaiveTime::parse_from_str(&exit_time, "%H:%M").is_err() {
        return Err(HybridTraderError::ConfigInvalid {
            section: "risk".to_string(),
            key: "exit_time".to_string(),
            reason: format!("invalid exit_time {exit_time:?}, expected HH:MM"),
        });
    }

    Ok(())
}

fn validate_data(config: &dyn ConfigPort) -> Result<(), HybridTraderError> {
    match config.get_string("data", "price_file") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(HybridTraderError::ConfigMissing {
            section: "data".to_string(),
            key: "price_file".to_string(),
        }),
    }
}
