//! Domain error types.
//!
//! Only fatal conditions live here. Recoverable ones (insufficient price
//! history, a flat rolling window, a failed quote fetch) are modelled as
//! values and never surface as errors.

/// Top-level error type for hybridtrader.
#[derive(Debug, thiserror::Error)]
pub enum HybridTraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&HybridTraderError> for std::process::ExitCode {
    fn from(err: &HybridTraderError) -> Self {
        let code: u8 = match err {
            HybridTraderError::Io(_) => 1,
            HybridTraderError::ConfigParse { .. }
            | HybridTraderError::ConfigMissing { .. }
            | HybridTraderError::ConfigInvalid { .. } => 2,
            HybridTraderError::Data { .. } => 3,
            HybridTraderError::InvalidInput { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
