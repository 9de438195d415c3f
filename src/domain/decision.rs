//! Decision matrix fusing the technical signal with macro sentiment.
//!
//! The matrix is total over every (signal kind, sentiment category) pair:
//! a technical BUY or SELL always trades, sized by how far macro sentiment
//! agrees; a NEUTRAL or NO_DATA technical signal never trades.

use crate::domain::error::HybridTraderError;
use crate::domain::macro_factors::{MacroSentiment, SentimentCategory};
use crate::domain::risk::{RiskMetrics, calculate_risk};
use crate::domain::settings::EngineConfig;
use crate::domain::signal::{SignalKind, TechnicalSignal};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Buy,
    Sell,
    NoTrade,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
            Action::NoTrade => write!(f, "NO_TRADE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationTier {
    High,
    Medium,
    Low,
    None,
}

impl AllocationTier {
    pub fn allocation_pct(self, high: f64, medium: f64, low: f64) -> f64 {
        match self {
            AllocationTier::High => high,
            AllocationTier::Medium => medium,
            AllocationTier::Low => low,
            AllocationTier::None => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
    Low,
    None,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => write!(f, "HIGH"),
            Confidence::Medium => write!(f, "MEDIUM"),
            Confidence::Low => write!(f, "LOW"),
            Confidence::None => write!(f, "NONE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradingDecision {
    pub action: Action,
    pub allocation_pct: f64,
    pub confidence: Confidence,
    pub reasoning: Vec<String>,
    pub technical: TechnicalSignal,
    pub macro_sentiment: MacroSentiment,
    pub risk: RiskMetrics,
}

/// The pure 4x3 matrix. No state, no side effects.
pub fn resolve(
    technical: SignalKind,
    sentiment: SentimentCategory,
) -> (Action, AllocationTier, Confidence) {
    match technical {
        SignalKind::Buy => match sentiment {
            SentimentCategory::Bullish => (Action::Buy, AllocationTier::High, Confidence::High),
            SentimentCategory::Neutral => (Action::Buy, AllocationTier::Medium, Confidence::Medium),
            SentimentCategory::Bearish => (Action::Buy, AllocationTier::Low, Confidence::Low),
        },
        SignalKind::Sell => match sentiment {
            SentimentCategory::Bearish => (Action::Sell, AllocationTier::High, Confidence::High),
            SentimentCategory::Neutral => {
                (Action::Sell, AllocationTier::Medium, Confidence::Medium)
            }
            SentimentCategory::Bullish => (Action::Sell, AllocationTier::Low, Confidence::Low),
        },
        SignalKind::Neutral | SignalKind::NoData => {
            (Action::NoTrade, AllocationTier::None, Confidence::None)
        }
    }
}

fn technical_line(technical: &TechnicalSignal) -> String {
    let zscore = technical.zscore.unwrap_or_default();
    match technical.kind {
        SignalKind::Buy => format!("Technical: price oversold (z-score: {zscore:.2})"),
        SignalKind::Sell => format!("Technical: price overbought (z-score: {zscore:.2})"),
        SignalKind::Neutral | SignalKind::NoData => {
            "Technical: price near equilibrium, no clear signal".to_string()
        }
    }
}

fn macro_line(action: Action, sentiment: &MacroSentiment) -> String {
    let strength = match (action, sentiment.category) {
        (Action::Buy, SentimentCategory::Bullish) => "strong bullish",
        (Action::Buy, SentimentCategory::Bearish) => "bearish",
        (Action::Sell, SentimentCategory::Bearish) => "strong bearish",
        (Action::Sell, SentimentCategory::Bullish) => "bullish",
        (_, SentimentCategory::Neutral) | (Action::NoTrade, _) => "neutral",
    };
    format!(
        "Macro: {strength} sentiment (score: {score})",
        score = sentiment.score
    )
}

fn agreement_line(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::High => "Both signals aligned, high confidence trade",
        Confidence::Medium => "Mixed signals, medium confidence trade",
        Confidence::Low => "Conflicting signals, low confidence trade",
        Confidence::None => "No trade opportunity identified",
    }
}

/// Runs the matrix, then derives risk metrics. The risk calculator is only
/// invoked once the action for this run is known.
pub fn make_decision(
    technical: &TechnicalSignal,
    sentiment: &MacroSentiment,
    config: &EngineConfig,
) -> Result<TradingDecision, HybridTraderError> {
    let (action, tier, confidence) = resolve(technical.kind, sentiment.category);
    let allocation_pct = tier.allocation_pct(
        config.allocation.high,
        config.allocation.medium,
        config.allocation.low,
    );

    let mut reasoning = vec![technical_line(technical)];
    if action != Action::NoTrade {
        reasoning.push(macro_line(action, sentiment));
    }
    reasoning.push(agreement_line(confidence).to_string());

    let risk = if action == Action::NoTrade {
        RiskMetrics::none()
    } else {
        let current_price =
            technical
                .current_price
                .ok_or_else(|| HybridTraderError::InvalidInput {
                    reason: "technical signal has no current price".to_string(),
                })?;
        calculate_risk(
            action,
            current_price,
            allocation_pct,
            config.trading.capital_base,
            config.risk.stop_loss_pct,
        )?
    };

    Ok(TradingDecision {
        action,
        allocation_pct,
        confidence,
        reasoning,
        technical: technical.clone(),
        macro_sentiment: sentiment.clone(),
        risk,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::{
        AllocationConfig, FactorWeights, MacroConfig, QuoteSymbols, RiskConfig, TradingConfig,
    };

    fn sample_engine_config() -> EngineConfig {
        EngineConfig {
            trading: TradingConfig {
                symbol: "NIFTY50".into(),
                lookback_period: 20,
                zscore_threshold: 2.0,
                capital_base: 100_000.0,
            },
            macro_factors: MacroConfig {
                weights: FactorWeights {
                    policy_rate: 3,
                    capital_flow: 2,
                    global_index: 2,
                    fx_rate: 1,
                    volatility_index: 2,
                },
                bullish_threshold: 3,
                bearish_threshold: -3,
                symbols: QuoteSymbols {
                    global_index: "GLOBAL".into(),
                    fx_rate: "FX".into(),
                    volatility_index: "VOL".into(),
                },
            },
            allocation: AllocationConfig {
                high: 80.0,
                medium: 50.0,
                low: 20.0,
            },
            risk: RiskConfig {
                stop_loss_pct: 1.0,
                exit_time: "15:15".into(),
            },
        }
    }

    fn buy_signal() -> TechnicalSignal {
        TechnicalSignal {
            kind: SignalKind::Buy,
            zscore: Some(-2.3),
            current_price: Some(24_900.0),
            mean_price: Some(25_580.0),
            deviation: Some(-680.0),
            deviation_pct: Some(-2.66),
            reason: "Price is oversold (z-score: -2.30). Price 2.66% below mean.".into(),
        }
    }

    fn neutral_signal() -> TechnicalSignal {
        TechnicalSignal {
            kind: SignalKind::Neutral,
            zscore: Some(0.4),
            current_price: Some(25_500.0),
            mean_price: Some(25_400.0),
            deviation: Some(100.0),
            deviation_pct: Some(0.39),
            reason: "Price is near equilibrium (z-score: 0.40).".into(),
        }
    }

    fn sentiment(category: SentimentCategory, score: i64) -> MacroSentiment {
        MacroSentiment {
            category,
            score,
            breakdown: vec![],
        }
    }

    #[test]
    fn matrix_is_total() {
        let kinds = [
            SignalKind::Buy,
            SignalKind::Sell,
            SignalKind::Neutral,
            SignalKind::NoData,
        ];
        let categories = [
            SentimentCategory::Bullish,
            SentimentCategory::Neutral,
            SentimentCategory::Bearish,
        ];

        for kind in kinds {
            for category in categories {
                let (action, tier, confidence) = resolve(kind, category);
                match kind {
                    SignalKind::Buy => assert_eq!(action, Action::Buy),
                    SignalKind::Sell => assert_eq!(action, Action::Sell),
                    SignalKind::Neutral | SignalKind::NoData => {
                        assert_eq!(action, Action::NoTrade);
                        assert_eq!(tier, AllocationTier::None);
                        assert_eq!(confidence, Confidence::None);
                    }
                }
            }
        }
    }

    #[test]
    fn aligned_buy_is_high_tier() {
        let (action, tier, confidence) =
            resolve(SignalKind::Buy, SentimentCategory::Bullish);
        assert_eq!(action, Action::Buy);
        assert_eq!(tier, AllocationTier::High);
        assert_eq!(confidence, Confidence::High);
    }

    #[test]
    fn conflicting_sell_is_low_tier() {
        let (action, tier, confidence) =
            resolve(SignalKind::Sell, SentimentCategory::Bullish);
        assert_eq!(action, Action::Sell);
        assert_eq!(tier, AllocationTier::Low);
        assert_eq!(confidence, Confidence::Low);
    }

    #[test]
    fn aligned_sell_is_high_tier() {
        let (action, tier, _) = resolve(SignalKind::Sell, SentimentCategory::Bearish);
        assert_eq!(action, Action::Sell);
        assert_eq!(tier, AllocationTier::High);
    }

    #[test]
    fn decision_carries_allocation_and_risk() {
        let config = sample_engine_config();
        let decision = make_decision(
            &buy_signal(),
            &sentiment(SentimentCategory::Bullish, 5),
            &config,
        )
        .unwrap();

        assert_eq!(decision.action, Action::Buy);
        assert_eq!(decision.allocation_pct, 80.0);
        assert_eq!(decision.confidence, Confidence::High);
        assert_eq!(decision.risk.entry_price, Some(24_900.0));
        assert_eq!(decision.risk.capital_allocated, 80_000.0);
    }

    #[test]
    fn reasoning_has_three_lines_for_a_trade() {
        let config = sample_engine_config();
        let decision = make_decision(
            &buy_signal(),
            &sentiment(SentimentCategory::Bearish, -4),
            &config,
        )
        .unwrap();

        assert_eq!(decision.reasoning.len(), 3);
        assert!(decision.reasoning[0].contains("oversold"));
        assert!(decision.reasoning[0].contains("-2.30"));
        assert!(decision.reasoning[1].contains("bearish sentiment"));
        assert!(decision.reasoning[1].contains("-4"));
        assert!(decision.reasoning[2].contains("Conflicting signals"));
        assert_eq!(decision.allocation_pct, 20.0);
    }

    #[test]
    fn no_trade_omits_macro_line() {
        let config = sample_engine_config();
        let decision = make_decision(
            &neutral_signal(),
            &sentiment(SentimentCategory::Bullish, 6),
            &config,
        )
        .unwrap();

        assert_eq!(decision.action, Action::NoTrade);
        assert_eq!(decision.allocation_pct, 0.0);
        assert_eq!(decision.reasoning.len(), 2);
        assert!(decision.reasoning[0].contains("equilibrium"));
        assert!(decision.reasoning[1].contains("No trade opportunity"));
        assert_eq!(decision.risk, RiskMetrics::none());
    }

    #[test]
    fn no_data_decides_like_neutral() {
        let config = sample_engine_config();
        let no_data = TechnicalSignal {
            kind: SignalKind::NoData,
            zscore: None,
            current_price: None,
            mean_price: None,
            deviation: None,
            deviation_pct: None,
            reason: "insufficient data".into(),
        };
        let decision = make_decision(
            &no_data,
            &sentiment(SentimentCategory::Bearish, -6),
            &config,
        )
        .unwrap();

        assert_eq!(decision.action, Action::NoTrade);
        assert_eq!(decision.confidence, Confidence::None);
        assert_eq!(decision.risk, RiskMetrics::none());
    }

    #[test]
    fn identical_inputs_identical_outputs() {
        let config = sample_engine_config();
        let s = sentiment(SentimentCategory::Neutral, 1);
        let first = make_decision(&buy_signal(), &s, &config).unwrap();
        let second = make_decision(&buy_signal(), &s, &config).unwrap();
        assert_eq!(first, second);
    }
}
