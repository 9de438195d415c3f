//! Weighted macro factor registry and sentiment scoring.
//!
//! Five fixed factors: policy rate, capital flow, global index, fx rate and
//! volatility index. Each slot holds a raw value, a directional change in
//! {-1, 0, +1} and a signed weight fixed at construction. The registry is a
//! closed set of named slots, so the weighted sum always covers exactly the
//! five factors.
//!
//! Factor rules:
//! - policy_rate: rate cut = +1, rate hike = -1, unchanged or no prior = 0
//! - capital_flow: net flow above +1000 = +1, below -1000 = -1, else 0
//! - global_index: session change above +0.5% = +1, below -0.5% = -1, else 0
//! - fx_rate: quote down more than 0.3% (currency strengthening) = +1,
//!   up more than 0.3% = -1, else 0
//! - volatility_index: session change below -5% = +1, above +5% = -1, else 0

use crate::domain::error::HybridTraderError;
use crate::domain::settings::MacroConfig;
use crate::domain::signal::round2;
use crate::ports::quote_port::QuotePort;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorKind {
    PolicyRate,
    CapitalFlow,
    GlobalIndex,
    FxRate,
    VolatilityIndex,
}

impl FactorKind {
    pub const ALL: [FactorKind; 5] = [
        FactorKind::PolicyRate,
        FactorKind::CapitalFlow,
        FactorKind::GlobalIndex,
        FactorKind::FxRate,
        FactorKind::VolatilityIndex,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FactorKind::PolicyRate => "policy_rate",
            FactorKind::CapitalFlow => "capital_flow",
            FactorKind::GlobalIndex => "global_index",
            FactorKind::FxRate => "fx_rate",
            FactorKind::VolatilityIndex => "volatility_index",
        }
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentCategory {
    Bullish,
    Neutral,
    Bearish,
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentCategory::Bullish => write!(f, "BULLISH"),
            SentimentCategory::Neutral => write!(f, "NEUTRAL"),
            SentimentCategory::Bearish => write!(f, "BEARISH"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactorSlot {
    pub raw_value: Option<f64>,
    /// Directional vote: -1, 0 or +1.
    pub change: i64,
    pub weight: i64,
}

impl FactorSlot {
    fn new(weight: i64) -> Self {
        Self {
            raw_value: None,
            change: 0,
            weight,
        }
    }

    pub fn polarity(&self) -> &'static str {
        match self.change.signum() {
            1 => "Positive",
            -1 => "Negative",
            _ => "Neutral",
        }
    }

    pub fn contribution(&self) -> i64 {
        self.change * self.weight
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactorBreakdown {
    pub factor: FactorKind,
    pub raw_value: Option<f64>,
    pub polarity: &'static str,
    pub contribution: i64,
}

/// Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroSentiment {
    pub category: SentimentCategory,
    pub score: i64,
    pub breakdown: Vec<FactorBreakdown>,
}

/// Accumulates factor values for one run, then reduces them to a sentiment.
/// Each pipeline invocation constructs its own scorer.
#[derive(Debug, Clone)]
pub struct MacroScorer {
    config: MacroConfig,
    policy_rate: FactorSlot,
    capital_flow: FactorSlot,
    global_index: FactorSlot,
    fx_rate: FactorSlot,
    volatility_index: FactorSlot,
}

impl MacroScorer {
    pub fn new(config: &MacroConfig) -> Self {
        Self {
            policy_rate: FactorSlot::new(config.weights.policy_rate),
            capital_flow: FactorSlot::new(config.weights.capital_flow),
            global_index: FactorSlot::new(config.weights.global_index),
            fx_rate: FactorSlot::new(config.weights.fx_rate),
            volatility_index: FactorSlot::new(config.weights.volatility_index),
            config: config.clone(),
        }
    }

    fn slots(&self) -> [(FactorKind, &FactorSlot); 5] {
        [
            (FactorKind::PolicyRate, &self.policy_rate),
            (FactorKind::CapitalFlow, &self.capital_flow),
            (FactorKind::GlobalIndex, &self.global_index),
            (FactorKind::FxRate, &self.fx_rate),
            (FactorKind::VolatilityIndex, &self.volatility_index),
        ]
    }

    pub fn slot(&self, kind: FactorKind) -> &FactorSlot {
        match kind {
            FactorKind::PolicyRate => &self.policy_rate,
            FactorKind::CapitalFlow => &self.capital_flow,
            FactorKind::GlobalIndex => &self.global_index,
            FactorKind::FxRate => &self.fx_rate,
            FactorKind::VolatilityIndex => &self.volatility_index,
        }
    }

    /// A rate cut reads bullish, a hike bearish. Without a previous rate the
    /// factor stays neutral.
    pub fn set_policy_rate(&mut self, current_rate: f64, previous_rate: Option<f64>) {
        self.policy_rate.raw_value = Some(current_rate);
        self.policy_rate.change = match previous_rate {
            Some(prev) if current_rate < prev => 1,
            Some(prev) if current_rate > prev => -1,
            _ => 0,
        };
    }

    pub fn set_capital_flow(&mut self, net_flow: f64) {
        self.capital_flow.raw_value = Some(net_flow);
        self.capital_flow.change = if net_flow > 1000.0 {
            1
        } else if net_flow < -1000.0 {
            -1
        } else {
            0
        };
    }

    pub fn fetch_global_index(
        &mut self,
        quotes: &dyn QuotePort,
    ) -> Result<(), HybridTraderError> {
        match quotes.last_two_closes(&self.config.symbols.global_index) {
            Ok((previous, latest)) => {
                let pct_change = (latest - previous) / previous * 100.0;
                self.global_index.raw_value = Some(round2(pct_change));
                self.global_index.change = if pct_change > 0.5 {
                    1
                } else if pct_change < -0.5 {
                    -1
                } else {
                    0
                };
                Ok(())
            }
            Err(e) => {
                self.global_index.change = 0;
                Err(e)
            }
        }
    }

    pub fn fetch_fx_rate(&mut self, quotes: &dyn QuotePort) -> Result<(), HybridTraderError> {
        match quotes.last_two_closes(&self.config.symbols.fx_rate) {
            Ok((previous, latest)) => {
                let pct_change = (latest - previous) / previous * 100.0;
                self.fx_rate.raw_value = Some(round2(latest));
                self.fx_rate.change = if pct_change < -0.3 {
                    1
                } else if pct_change > 0.3 {
                    -1
                } else {
                    0
                };
                Ok(())
            }
            Err(e) => {
                self.fx_rate.change = 0;
                Err(e)
            }
        }
    }

    pub fn fetch_volatility_index(
        &mut self,
        quotes: &dyn QuotePort,
    ) -> Result<(), HybridTraderError> {
        match quotes.last_two_closes(&self.config.symbols.volatility_index) {
            Ok((previous, latest)) => {
                let pct_change = (latest - previous) / previous * 100.0;
                self.volatility_index.raw_value = Some(round2(latest));
                self.volatility_index.change = if pct_change < -5.0 {
                    1
                } else if pct_change > 5.0 {
                    -1
                } else {
                    0
                };
                Ok(())
            }
            Err(e) => {
                self.volatility_index.change = 0;
                Err(e)
            }
        }
    }

    /// Fetch every auto factor. A failed fetch leaves that factor neutral and
    /// is reported in the returned list; the remaining factors still run.
    pub fn fetch_all(&mut self, quotes: &dyn QuotePort) -> Vec<(FactorKind, HybridTraderError)> {
        let mut failures = Vec::new();
        if let Err(e) = self.fetch_global_index(quotes) {
            failures.push((FactorKind::GlobalIndex, e));
        }
        if let Err(e) = self.fetch_fx_rate(quotes) {
            failures.push((FactorKind::FxRate, e));
        }
        if let Err(e) = self.fetch_volatility_index(quotes) {
            failures.push((FactorKind::VolatilityIndex, e));
        }
        failures
    }

    /// Weighted sum over all five factors, recomputed in full on each call.
    pub fn score(&self) -> i64 {
        self.slots().iter().map(|(_, slot)| slot.contribution()).sum()
    }

    pub fn sentiment(&self) -> MacroSentiment {
        let score = self.score();

        let category = if score > self.config.bullish_threshold {
            SentimentCategory::Bullish
        } else if score < self.config.bearish_threshold {
            SentimentCategory::Bearish
        } else {
            SentimentCategory::Neutral
        };

        let breakdown = self
            .slots()
            .iter()
            .map(|(kind, slot)| FactorBreakdown {
                factor: *kind,
                raw_value: slot.raw_value,
                polarity: slot.polarity(),
                contribution: slot.contribution(),
            })
            .collect();

        MacroSentiment {
            category,
            score,
            breakdown,
        }
    }
}
