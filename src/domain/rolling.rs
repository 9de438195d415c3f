//! Rolling mean, standard deviation and z-score over a close-price series.
//!
//! ROLLING_MEAN(L)[i] = mean of closes over indices i-L+1..=i
//! ROLLING_STD(L)[i]  = sample standard deviation (N-1 denominator) over the same window
//! ZSCORE(L)[i]       = (close[i] - mean) / std
//! Warmup: first (L-1) points carry no stats. A flat window (std = 0) also
//! carries no stats; the z-score is undefined there rather than infinite.

use crate::domain::price::PricePoint;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct WindowStats {
    pub rolling_mean: f64,
    pub rolling_std: f64,
    pub zscore: f64,
    pub deviation: f64,
    pub deviation_pct: f64,
}

/// One entry per input point. `stats` is `None` during warmup and for flat
/// windows; it is a missing-value marker, never a zero fill.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedStat {
    pub date: NaiveDate,
    pub close: f64,
    pub stats: Option<WindowStats>,
}

pub fn compute_rolling_stats(points: &[PricePoint], lookback: usize) -> Vec<WindowedStat> {
    let mut out = Vec::with_capacity(points.len());
    let warmup = lookback.saturating_sub(1);

    for i in 0..points.len() {
        let close = points[i].close;

        let stats = if lookback >= 2 && i >= warmup {
            let start = i + 1 - lookback;
            let window = &points[start..=i];

            let mean: f64 = window.iter().map(|p| p.close).sum::<f64>() / lookback as f64;

            let variance: f64 = window
                .iter()
                .map(|p| {
                    let diff = p.close - mean;
                    diff * diff
                })
                .sum::<f64>()
                / (lookback - 1) as f64;
            let std = variance.sqrt();

            if std > 0.0 {
                let deviation = close - mean;
                Some(WindowStats {
                    rolling_mean: mean,
                    rolling_std: std,
                    zscore: deviation / std,
                    deviation,
                    deviation_pct: deviation / mean * 100.0,
                })
            } else {
                None
            }
        } else {
            None
        };

        out.push(WindowedStat {
            date: points[i].date,
            close,
            stats,
        });
    }

    out
}
