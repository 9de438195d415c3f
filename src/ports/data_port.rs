//! Price series access port trait.

use crate::domain::error::HybridTraderError;
use crate::domain::price::PricePoint;
use chrono::NaiveDate;

pub trait MarketDataPort {
    /// The full cached daily series, sanitized: strictly increasing dates,
    /// duplicates collapsed keeping the latest row.
    fn load_daily(&self) -> Result<Vec<PricePoint>, HybridTraderError>;

    /// (first date, last date, point count), or `None` for an empty cache.
    fn data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, HybridTraderError> {
        let points = self.load_daily()?;
        Ok(points
            .first()
            .zip(points.last())
            .map(|(first, last)| (first.date, last.date, points.len())))
    }
}
