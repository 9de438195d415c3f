//! Trade order construction from a finished decision.

use crate::domain::decision::{Action, Confidence, TradingDecision};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeOrder {
    pub symbol: String,
    pub action: Action,
    pub order_type: OrderType,
    pub quantity: i64,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub target: f64,
    pub exit_time: String,
    pub confidence: Confidence,
    pub technical_zscore: Option<f64>,
    pub macro_score: i64,
}

/// No order is produced for NO_TRADE. A quantity of zero (allocation too
/// small for the price) is still returned; discarding such orders is the
/// caller's policy.
pub fn build_order(
    decision: &TradingDecision,
    symbol: &str,
    exit_time: &str,
) -> Option<TradeOrder> {
    if decision.action == Action::NoTrade {
        return None;
    }

    let entry_price = decision.risk.entry_price?;
    let stop_loss = decision.risk.stop_loss?;
    let target = decision.risk.target?;

    let quantity = if entry_price > 0.0 {
        (decision.risk.capital_allocated / entry_price).floor() as i64
    } else {
        0
    };

    Some(TradeOrder {
        symbol: symbol.to_string(),
        action: decision.action,
        order_type: OrderType::Market,
        quantity,
        entry_price,
        stop_loss,
        target,
        exit_time: exit_time.to_string(),
        confidence: decision.confidence,
        technical_zscore: decision.technical.zscore,
        macro_score: decision.macro_sentiment.score,
    })
}
