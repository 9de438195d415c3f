//! CSV price cache adapter.
//!
//! Reads the daily OHLCV cache written by the data-collection tooling:
//! `date,open,high,low,close,volume` with `%Y-%m-%d` dates. Rows are
//! sanitized on load: sorted by date, duplicate dates collapsed keeping the
//! last occurrence.

use crate::domain::error::HybridTraderError;
use crate::domain::price::PricePoint;
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvMarketData {
    path: PathBuf,
}

impl CsvMarketData {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

/// Sort by date and collapse duplicate dates, keeping the latest row.
pub fn sanitize(mut points: Vec<PricePoint>) -> Vec<PricePoint> {
    points.sort_by_key(|p| p.date);

    let mut out: Vec<PricePoint> = Vec::with_capacity(points.len());
    for point in points {
        match out.last_mut() {
            Some(last) if last.date == point.date => *last = point,
            _ => out.push(point),
        }
    }
    out
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<T, HybridTraderError>
where
    T::Err: std::fmt::Display,
{
    record
        .get(index)
        .ok_or_else(|| HybridTraderError::Data {
            reason: format!("missing {name} column"),
        })?
        .trim()
        .parse()
        .map_err(|e| HybridTraderError::Data {
            reason: format!("invalid {name} value: {e}"),
        })
}

impl MarketDataPort for CsvMarketData {
    fn load_daily(&self) -> Result<Vec<PricePoint>, HybridTraderError> {
        let content = fs::read_to_string(&self.path).map_err(|e| HybridTraderError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| HybridTraderError::Data {
                reason: format!("CSV parse error: {e}"),
            })?;

            let date_str = record.get(0).ok_or_else(|| HybridTraderError::Data {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                HybridTraderError::Data {
                    reason: format!("invalid date format: {e}"),
                }
            })?;

            points.push(PricePoint {
                date,
                open: parse_field(&record, 1, "open")?,
                high: parse_field(&record, 2, "high")?,
                low: parse_field(&record, 3, "low")?,
                close: parse_field(&record, 4, "close")?,
                volume: parse_field(&record, 5, "volume")?,
            });
        }

        Ok(sanitize(points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_daily_parses_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "daily.csv",
            "date,open,high,low,close,volume\n\
             2024-01-15,100.0,110.0,90.0,105.0,50000\n\
             2024-01-16,105.0,115.0,100.0,110.0,60000\n",
        );

        let points = CsvMarketData::new(path).load_daily().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(points[0].open, 100.0);
        assert_eq!(points[0].close, 105.0);
        assert_eq!(points[0].volume, 50_000);
    }

    #[test]
    fn load_daily_sorts_out_of_order_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "daily.csv",
            "date,open,high,low,close,volume\n\
             2024-01-17,1,1,1,115.0,10\n\
             2024-01-15,1,1,1,105.0,10\n\
             2024-01-16,1,1,1,110.0,10\n",
        );

        let points = CsvMarketData::new(path).load_daily().unwrap();
        let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![105.0, 110.0, 115.0]);
    }

    #[test]
    fn duplicate_dates_keep_the_latest_row() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "daily.csv",
            "date,open,high,low,close,volume\n\
             2024-01-15,1,1,1,100.0,10\n\
             2024-01-16,1,1,1,110.0,10\n\
             2024-01-15,1,1,1,102.0,10\n",
        );

        let points = CsvMarketData::new(path).load_daily().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].close, 102.0);
        assert_eq!(points[1].close, 110.0);
    }

    #[test]
    fn missing_file_is_a_data_error() {
        let adapter = CsvMarketData::new(PathBuf::from("/nonexistent/daily.csv"));
        let err = adapter.load_daily().unwrap_err();
        assert!(matches!(err, HybridTraderError::Data { .. }));
    }

    #[test]
    fn malformed_close_is_a_data_error() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "daily.csv",
            "date,open,high,low,close,volume\n2024-01-15,1,1,1,oops,10\n",
        );

        let err = CsvMarketData::new(path).load_daily().unwrap_err();
        assert!(matches!(err, HybridTraderError::Data { reason } if reason.contains("close")));
    }

    #[test]
    fn data_range_reports_bounds() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "daily.csv",
            "date,open,high,low,close,volume\n\
             2024-01-15,1,1,1,100.0,10\n\
             2024-01-18,1,1,1,104.0,10\n",
        );

        let range = CsvMarketData::new(path).data_range().unwrap();
        assert_eq!(
            range,
            Some((
                NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 18).unwrap(),
                2
            ))
        );
    }

    #[test]
    fn data_range_empty_file_is_none() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "daily.csv", "date,open,high,low,close,volume\n");
        assert_eq!(CsvMarketData::new(path).data_range().unwrap(), None);
    }

    #[test]
    fn sanitize_is_stable_for_unique_dates() {
        let points = vec![
            PricePoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 16).unwrap(),
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: 2.0,
                volume: 1,
            },
            PricePoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: 1.0,
                volume: 1,
            },
        ];
        let out = sanitize(points);
        assert_eq!(out.len(), 2);
        assert!(out[0].date < out[1].date);
    }
}
