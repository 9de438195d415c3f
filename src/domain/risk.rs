//! Stop-loss, target and capital-at-risk calculation.
//!
//! Reward is fixed at twice the stop-loss distance (1:2 risk:reward).

use crate::domain::decision::Action;
use crate::domain::error::HybridTraderError;
use crate::domain::signal::round2;

pub const RISK_REWARD_RATIO: &str = "1:2";

/// All fields are null/zero when no trade is taken.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskMetrics {
    pub entry_price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub target: Option<f64>,
    pub capital_allocated: f64,
    pub capital_at_risk: f64,
    pub risk_reward: Option<&'static str>,
}

impl RiskMetrics {
    pub fn none() -> Self {
        Self {
            entry_price: None,
            stop_loss: None,
            target: None,
            capital_allocated: 0.0,
            capital_at_risk: 0.0,
            risk_reward: None,
        }
    }
}

pub fn calculate_risk(
    action: Action,
    current_price: f64,
    allocation_pct: f64,
    capital_base: f64,
    stop_loss_pct: f64,
) -> Result<RiskMetrics, HybridTraderError> {
    if action == Action::NoTrade {
        return Ok(RiskMetrics::none());
    }

    if current_price <= 0.0 {
        return Err(HybridTraderError::InvalidInput {
            reason: format!("current_price must be positive, got {current_price}"),
        });
    }
    if capital_base <= 0.0 {
        return Err(HybridTraderError::InvalidInput {
            reason: format!("capital_base must be positive, got {capital_base}"),
        });
    }

    let capital_allocated = allocation_pct / 100.0 * capital_base;
    let capital_at_risk = capital_allocated * stop_loss_pct / 100.0;

    let (stop_loss, target) = if action == Action::Buy {
        (
            current_price * (1.0 - stop_loss_pct / 100.0),
            current_price * (1.0 + 2.0 * stop_loss_pct / 100.0),
        )
    } else {
        (
            current_price * (1.0 + stop_loss_pct / 100.0),
            current_price * (1.0 - 2.0 * stop_loss_pct / 100.0),
        )
    };

    Ok(RiskMetrics {
        entry_price: Some(round2(current_price)),
        stop_loss: Some(round2(stop_loss)),
        target: Some(round2(target)),
        capital_allocated: round2(capital_allocated),
        capital_at_risk: round2(capital_at_risk),
        risk_reward: Some(RISK_REWARD_RATIO),
    })
}
