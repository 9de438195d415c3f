#![allow(dead_code)]

use chrono::NaiveDate;
use hybridtrader::domain::error::HybridTraderError;
pub use hybridtrader::domain::price::PricePoint;
use hybridtrader::domain::settings::{
    AllocationConfig, EngineConfig, FactorWeights, MacroConfig, QuoteSymbols, RiskConfig,
    TradingConfig,
};
use hybridtrader::ports::quote_port::QuotePort;
use std::collections::HashMap;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive daily points from the given closes, starting 2024-01-01.
pub fn make_points(closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            date: date(2024, 1, 1) + chrono::Days::new(i as u64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
        })
        .collect()
}

pub fn sample_engine_config() -> EngineConfig {
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

pub struct MockQuotePort {
    pub closes: HashMap<String, (f64, f64)>,
    pub errors: HashMap<String, String>,
}

impl MockQuotePort {
    pub fn new() -> Self {
        Self {
            closes: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_closes(mut self, symbol: &str, previous: f64, latest: f64) -> Self {
        self.closes.insert(symbol.to_string(), (previous, latest));
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl QuotePort for MockQuotePort {
    fn last_two_closes(&self, symbol: &str) -> Result<(f64, f64), HybridTraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(HybridTraderError::Data {
                reason: reason.clone(),
            });
        }
        self.closes
            .get(symbol)
            .copied()
            .ok_or_else(|| HybridTraderError::Data {
                reason: format!("no quotes for {symbol}"),
            })
    }
}
