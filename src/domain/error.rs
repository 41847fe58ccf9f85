//! Error types for the shell around the analytics core.
//!
//! The analytics themselves never fail: insufficient data is reported through
//! `Option` results and sentinel metrics. These errors cover data access,
//! configuration and I/O.

use crate::domain::universe::UniverseError;

/// Top-level error type for titan.
#[derive(Debug, thiserror::Error)]
pub enum TitanError {
    #[error("data access error: {reason}")]
    DataAccess { reason: String },

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

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TitanError> for std::process::ExitCode {
    fn from(err: &TitanError) -> Self {
        let code: u8 = match err {
            TitanError::Io(_) => 1,
            TitanError::ConfigParse { .. }
            | TitanError::ConfigMissing { .. }
            | TitanError::ConfigInvalid { .. }
            | TitanError::Universe(_) => 2,
            TitanError::DataAccess { .. } => 3,
            TitanError::NoData { .. } | TitanError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_insufficient_data() {
        let err = TitanError::InsufficientData {
            symbol: "AAPL".into(),
            bars: 12,
            minimum: 21,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data for AAPL: have 12 bars, need 21"
        );
    }

    #[test]
    fn display_config_missing() {
        let err = TitanError::ConfigMissing {
            section: "data".into(),
            key: "directory".into(),
        };
        assert_eq!(err.to_string(), "missing config key [data] directory");
    }

    #[test]
    fn universe_error_converts() {
        let err: TitanError = UniverseError::EmptyToken.into();
        assert!(matches!(err, TitanError::Universe(UniverseError::EmptyToken)));
    }
}
