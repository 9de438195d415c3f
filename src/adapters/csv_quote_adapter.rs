//! CSV quote cache adapter.
//!
//! One file per symbol under the cache directory, same column layout as the
//! price cache. Only the closing column is read; the final two rows supply
//! the (previous, latest) close pair.

use crate::domain::error::HybridTraderError;
use crate::ports::quote_port::QuotePort;
use std::fs;
use std::path::PathBuf;

pub struct CsvQuoteAdapter {
    base_path: PathBuf,
}

impl CsvQuoteAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn quote_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.csv"))
    }
}

impl QuotePort for CsvQuoteAdapter {
    fn last_two_closes(&self, symbol: &str) -> Result<(f64, f64), HybridTraderError> {
        let path = self.quote_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| HybridTraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut closes = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| HybridTraderError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let close: f64 = record
                .get(4)
                .ok_or_else(|| HybridTraderError::Data {
                    reason: format!("missing close column in {}", path.display()),
                })?
                .trim()
                .parse()
                .map_err(|e| HybridTraderError::Data {
                    reason: format!("invalid close value in {}: {}", path.display(), e),
                })?;
            closes.push(close);
        }

        match closes[..] {
            [.., previous, latest] => Ok((previous, latest)),
            _ => Err(HybridTraderError::Data {
                reason: format!(
                    "need at least 2 sessions for {symbol}, have {}",
                    closes.len()
                ),
            }),
        }
    }
}
