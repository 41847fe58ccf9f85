//! INI file configuration adapter.
//!
//! Section and key names are case-insensitive. Values are trimmed and a
//! blank value (`end_date =`) reads as unset, so the caller's default
//! applies.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn value(&self, section: &str, key: &str) -> Option<String> {
        self.config
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.value(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.value(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.value(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config_validation::parse_optional_date;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    const TITAN_INI: &str = r#"
[data]
directory = /srv/prices
history_start = 2000-01-01

[backtest]
initial_capital = 250000
start_date = 2023-01-01
end_date = 2024-06-28

[universe]
symbols = AAPL, 0050, cash

[report]
curve_points = 5
"#;

    #[test]
    fn reads_every_titan_section() {
        let adapter = FileConfigAdapter::from_string(TITAN_INI).unwrap();
        assert_eq!(
            adapter.get_string("data", "directory"),
            Some("/srv/prices".to_string())
        );
        assert_eq!(
            adapter.get_string("universe", "symbols"),
            Some("AAPL, 0050, cash".to_string())
        );
        assert_eq!(
            adapter.get_double("backtest", "initial_capital", 0.0),
            250_000.0
        );
        assert_eq!(adapter.get_int("report", "curve_points", 0), 5);
    }

    #[test]
    fn history_window_dates_parse() {
        let adapter = FileConfigAdapter::from_string(TITAN_INI).unwrap();
        assert_eq!(
            parse_optional_date(&adapter, "data", "history_start").unwrap(),
            NaiveDate::from_ymd_opt(2000, 1, 1)
        );
        assert_eq!(
            parse_optional_date(&adapter, "backtest", "end_date").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 28)
        );
    }

    #[test]
    fn blank_end_date_is_unset() {
        let adapter =
            FileConfigAdapter::from_string("[backtest]\nend_date =\nstart_date =   \n").unwrap();
        assert_eq!(adapter.get_string("backtest", "end_date"), None);
        assert_eq!(adapter.get_string("backtest", "start_date"), None);
        assert_eq!(
            parse_optional_date(&adapter, "backtest", "end_date").unwrap(),
            None
        );
    }

    #[test]
    fn names_are_case_insensitive() {
        let adapter =
            FileConfigAdapter::from_string("[Data]\nHistory_Start = 1995-03-01\n").unwrap();
        assert_eq!(
            adapter.get_string("data", "history_start"),
            Some("1995-03-01".to_string())
        );
    }

    #[test]
    fn numeric_getters_fall_back_to_default() {
        let adapter = FileConfigAdapter::from_string(
            "[backtest]\ninitial_capital = not_a_number\n[report]\ncurve_points = many\n",
        )
        .unwrap();
        assert_eq!(adapter.get_double("backtest", "initial_capital", 99.9), 99.9);
        assert_eq!(adapter.get_double("backtest", "missing", 1.5), 1.5);
        assert_eq!(adapter.get_int("report", "curve_points", 3), 3);
        assert_eq!(adapter.get_int("report", "missing", 42), 42);
    }

    #[test]
    fn missing_keys_are_none() {
        let adapter = FileConfigAdapter::from_string("[data]\ndirectory = x\n").unwrap();
        assert_eq!(adapter.get_string("data", "history_start"), None);
        assert_eq!(adapter.get_string("backtest", "end_date"), None);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config(TITAN_INI);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("backtest", "end_date"),
            Some("2024-06-28".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/titan.ini");
        assert!(result.is_err());
    }
}
