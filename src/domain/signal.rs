//! Technical signal classification from the latest windowed stat.
//!
//! The threshold is a single symmetric magnitude: z-score below -T reads as
//! oversold, above +T as overbought. Comparisons use the raw z-score; the
//! stored fields are rounded to two decimals for presentation.

use crate::domain::rolling::WindowedStat;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Buy,
    Sell,
    Neutral,
    NoData,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Buy => write!(f, "BUY"),
            SignalKind::Sell => write!(f, "SELL"),
            SignalKind::Neutral => write!(f, "NEUTRAL"),
            SignalKind::NoData => write!(f, "NO_DATA"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TechnicalSignal {
    pub kind: SignalKind,
    pub zscore: Option<f64>,
    pub current_price: Option<f64>,
    pub mean_price: Option<f64>,
    pub deviation: Option<f64>,
    pub deviation_pct: Option<f64>,
    pub reason: String,
}

impl TechnicalSignal {
    fn no_data() -> Self {
        Self {
            kind: SignalKind::NoData,
            zscore: None,
            current_price: None,
            mean_price: None,
            deviation: None,
            deviation_pct: None,
            reason: "insufficient data".to_string(),
        }
    }
}

/// Round to two decimals for presentation fields.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn classify(latest: Option<&WindowedStat>, threshold: f64) -> TechnicalSignal {
    let Some(stat) = latest else {
        return TechnicalSignal::no_data();
    };
    let Some(stats) = &stat.stats else {
        return TechnicalSignal::no_data();
    };

    let zscore = stats.zscore;
    let (kind, reason) = if zscore < -threshold {
        (
            SignalKind::Buy,
            format!(
                "Price is oversold (z-score: {:.2}). Price {:.2}% below mean.",
                zscore,
                stats.deviation_pct.abs()
            ),
        )
    } else if zscore > threshold {
        (
            SignalKind::Sell,
            format!(
                "Price is overbought (z-score: {:.2}). Price {:.2}% above mean.",
                zscore, stats.deviation_pct
            ),
        )
    } else {
        (
            SignalKind::Neutral,
            format!("Price is near equilibrium (z-score: {:.2}).", zscore),
        )
    };

    TechnicalSignal {
        kind,
        zscore: Some(round2(zscore)),
        current_price: Some(round2(stat.close)),
        mean_price: Some(round2(stats.rolling_mean)),
        deviation: Some(round2(stats.deviation)),
        deviation_pct: Some(round2(stats.deviation_pct)),
        reason,
    }
}
