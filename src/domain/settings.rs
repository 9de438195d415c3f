//! Engine configuration.
//!
//! Built once from a [`ConfigPort`](crate::ports::config_port::ConfigPort) in
//! the CLI layer and passed by reference into the core; components never
//! re-read configuration mid-pipeline.

#[derive(Debug, Clone)]
pub struct TradingConfig {
    pub symbol: String,
    pub lookback_period: usize,
    /// Symmetric z-score magnitude; derived from the buy threshold.
    pub zscore_threshold: f64,
    pub capital_base: f64,
}

#[derive(Debug, Clone)]
pub struct FactorWeights {
    pub policy_rate: i64,
    pub capital_flow: i64,
    pub global_index: i64,
    pub fx_rate: i64,
    pub volatility_index: i64,
}

/// Quote-cache symbols for the auto-fetched factors.
#[derive(Debug, Clone)]
pub struct QuoteSymbols {
    pub global_index: String,
    pub fx_rate: String,
    pub volatility_index: String,
}

#[derive(Debug, Clone)]
pub struct MacroConfig {
    pub weights: FactorWeights,
    pub bullish_threshold: i64,
    pub bearish_threshold: i64,
    pub symbols: QuoteSymbols,
}

/// Capital allocation tiers as percentages of the capital base.
#[derive(Debug, Clone)]
pub struct AllocationConfig {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

#[derive(Debug, Clone)]
pub struct RiskConfig {
    pub stop_loss_pct: f64,
    pub exit_time: String,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub trading: TradingConfig,
    pub macro_factors: MacroConfig,
    pub allocation: AllocationConfig,
    pub risk: RiskConfig,
}
