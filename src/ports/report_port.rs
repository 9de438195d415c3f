//! Signal reporting port trait.

use crate::domain::decision::TradingDecision;
use crate::domain::error::HybridTraderError;
use crate::domain::order::TradeOrder;
use chrono::NaiveDate;

/// Port for recording one finished run.
pub trait ReportPort {
    fn append(
        &self,
        date: NaiveDate,
        decision: &TradingDecision,
        order: Option<&TradeOrder>,
    ) -> Result<(), HybridTraderError>;
}
