//! Quote access port trait for the auto-fetched macro factors.

use crate::domain::error::HybridTraderError;

pub trait QuotePort {
    /// Returns `(previous_close, latest_close)` for the symbol.
    fn last_two_closes(&self, symbol: &str) -> Result<(f64, f64), HybridTraderError>;
}
