//! Configuration validation.
//!
//! Validates the INI sections before any data is loaded.

use crate::domain::error::TitanError;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), TitanError> {
    validate_data_directory(config)?;
    validate_initial_capital(config)?;
    validate_dates(config)?;
    validate_symbols(config)?;
    validate_curve_points(config)?;
    Ok(())
}

/// Parse an optional `YYYY-MM-DD` value; a missing key gives `None`.
pub fn parse_optional_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<NaiveDate>, TitanError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
            .map(Some)
            .map_err(|_| TitanError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", key),
            }),
    }
}

fn validate_data_directory(config: &dyn ConfigPort) -> Result<(), TitanError> {
    match config.get_string("data", "directory") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(TitanError::ConfigMissing {
            section: "data".to_string(),
            key: "directory".to_string(),
        }),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), TitanError> {
    let value = config.get_double("backtest", "initial_capital", 1.0);
    if value <= 0.0 || !value.is_finite() {
        return Err(TitanError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_capital".to_string(),
            reason: "initial_capital must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), TitanError> {
    parse_optional_date(config, "data", "history_start")?;
    let start = parse_optional_date(config, "backtest", "start_date")?;
    let end = parse_optional_date(config, "backtest", "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(TitanError::ConfigInvalid {
                section: "backtest".to_string(),
                key: "start_date".to_string(),
                reason: "start_date must be before end_date".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), TitanError> {
    if let Some(symbols) = config.get_string("universe", "symbols") {
        parse_symbols(&symbols)?;
    }
    Ok(())
}

fn validate_curve_points(config: &dyn ConfigPort) -> Result<(), TitanError> {
    if config.get_int("report", "curve_points", 0) < 0 {
        return Err(TitanError::ConfigInvalid {
            section: "report".to_string(),
            key: "curve_points".to_string(),
            reason: "curve_points must be non-negative".to_string(),
        });
    }
    Ok(())
}
