//! Append-only CSV signal log.
//!
//! One audit row per run. The header is written only when the file does not
//! exist yet, so repeated runs accumulate history.

use crate::domain::decision::TradingDecision;
use crate::domain::error::HybridTraderError;
use crate::domain::order::TradeOrder;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;
use std::fs::OpenOptions;
use std::path::PathBuf;

const HEADER: [&str; 12] = [
    "date",
    "technical_signal",
    "zscore",
    "macro_sentiment",
    "macro_score",
    "action",
    "allocation_pct",
    "confidence",
    "entry_price",
    "stop_loss",
    "target",
    "quantity",
];

pub struct CsvSignalLog {
    path: PathBuf,
}

impl CsvSignalLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl ReportPort for CsvSignalLog {
    fn append(
        &self,
        date: NaiveDate,
        decision: &TradingDecision,
        order: Option<&TradeOrder>,
    ) -> Result<(), HybridTraderError> {
        let write_header = !self.path.exists();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| HybridTraderError::Data {
                reason: format!("failed to open {}: {}", self.path.display(), e),
            })?;

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if write_header {
            wtr.write_record(HEADER)
                .map_err(|e| HybridTraderError::Data {
                    reason: format!("failed to write signal header: {e}"),
                })?;
        }

        let quantity = order.map(|o| o.quantity.to_string()).unwrap_or_default();

        wtr.write_record([
            date.format("%Y-%m-%d").to_string(),
            decision.technical.kind.to_string(),
            fmt_opt(decision.technical.zscore),
            decision.macro_sentiment.category.to_string(),
            decision.macro_sentiment.score.to_string(),
            decision.action.to_string(),
            decision.allocation_pct.to_string(),
            decision.confidence.to_string(),
            fmt_opt(decision.risk.entry_price),
            fmt_opt(decision.risk.stop_loss),
            fmt_opt(decision.risk.target),
            quantity,
        ])
        .map_err(|e| HybridTraderError::Data {
            reason: format!("failed to write signal row: {e}"),
        })?;

        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::{Action, Confidence};
    use crate::domain::macro_factors::{MacroSentiment, SentimentCategory};
    use crate::domain::risk::{RISK_REWARD_RATIO, RiskMetrics};
    use crate::domain::signal::{SignalKind, TechnicalSignal};
    use std::fs;
    use tempfile::TempDir;

    fn sample_decision() -> TradingDecision {
        TradingDecision {
            action: Action::Buy,
            allocation_pct: 80.0,
            confidence: Confidence::High,
            reasoning: vec![],
            technical: TechnicalSignal {
                kind: SignalKind::Buy,
                zscore: Some(-2.3),
                current_price: Some(24_900.0),
                mean_price: Some(25_580.0),
                deviation: Some(-680.0),
                deviation_pct: Some(-2.66),
                reason: String::new(),
            },
            macro_sentiment: MacroSentiment {
                category: SentimentCategory::Bullish,
                score: 5,
                breakdown: vec![],
            },
            risk: RiskMetrics {
                entry_price: Some(24_900.0),
                stop_loss: Some(24_651.0),
                target: Some(25_398.0),
                capital_allocated: 80_000.0,
                capital_at_risk: 800.0,
                risk_reward: Some(RISK_REWARD_RATIO),
            },
        }
    }

    fn no_trade_decision() -> TradingDecision {
        TradingDecision {
            action: Action::NoTrade,
            allocation_pct: 0.0,
            confidence: Confidence::None,
            reasoning: vec![],
            technical: TechnicalSignal {
                kind: SignalKind::Neutral,
                zscore: Some(0.5),
                current_price: Some(25_000.0),
                mean_price: Some(24_900.0),
                deviation: Some(100.0),
                deviation_pct: Some(0.4),
                reason: String::new(),
            },
            macro_sentiment: MacroSentiment {
                category: SentimentCategory::Neutral,
                score: 0,
                breakdown: vec![],
            },
            risk: RiskMetrics::none(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn creates_file_with_header_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("signals.csv");
        let log = CsvSignalLog::new(path.clone());

        let decision = sample_decision();
        log.append(date(2024, 6, 3), &decision, None).unwrap();
        log.append(date(2024, 6, 4), &decision, None).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date,technical_signal,zscore"));
        assert!(lines[1].starts_with("2024-06-03,BUY,-2.3,BULLISH,5,BUY,80"));
        assert!(lines[2].starts_with("2024-06-04"));
    }

    #[test]
    fn records_order_quantity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("signals.csv");
        let log = CsvSignalLog::new(path.clone());

        let decision = sample_decision();
        let order = TradeOrder {
            symbol: "NIFTY50".into(),
            action: Action::Buy,
            order_type: crate::domain::order::OrderType::Market,
            quantity: 3,
            entry_price: 24_900.0,
            stop_loss: 24_651.0,
            target: 25_398.0,
            exit_time: "15:15".into(),
            confidence: Confidence::High,
            technical_zscore: Some(-2.3),
            macro_score: 5,
        };
        log.append(date(2024, 6, 3), &decision, Some(&order)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.lines().nth(1).unwrap().ends_with(",3"));
    }

    #[test]
    fn no_trade_row_has_empty_risk_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("signals.csv");
        let log = CsvSignalLog::new(path.clone());

        log.append(date(2024, 6, 3), &no_trade_decision(), None)
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert!(row.contains("NO_TRADE"));
        assert!(row.ends_with(",,,,"));
    }
}
