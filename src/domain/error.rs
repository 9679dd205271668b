//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for backonaut.
#[derive(Debug, thiserror::Error)]
pub enum BackonautError {
    #[error("invalid order: {reason}")]
    InvalidOrder { reason: String },

    #[error("no price supplied for held symbol {symbol}")]
    MissingPrice { symbol: String },

    #[error("malformed bar for {symbol} at {timestamp}: {reason}")]
    MalformedBar {
        symbol: String,
        timestamp: NaiveDate,
        reason: String,
    },

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

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&BackonautError> for std::process::ExitCode {
    fn from(err: &BackonautError) -> Self {
        let code: u8 = match err {
            BackonautError::Io(_) => 1,
            BackonautError::ConfigParse { .. }
            | BackonautError::ConfigMissing { .. }
            | BackonautError::ConfigInvalid { .. } => 2,
            BackonautError::Data { .. } => 3,
            BackonautError::InvalidOrder { .. } => 4,
            BackonautError::MissingPrice { .. } | BackonautError::MalformedBar { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
