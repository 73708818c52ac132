//! Application configuration
//!
//! Config is loaded with a layered resolution:
//! 1. An explicit path (e.g. `--config`), if it exists
//! 2. The override in the data dir (~/.local/share/moneylytics/config/moneylytics.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Missing keys in an override fall back to the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/moneylytics.toml");

/// Default threshold above which an expense amount gets an advisory
pub const DEFAULT_LARGE_AMOUNT_THRESHOLD: f64 = 1_000_000.0;

/// Longest accepted report window, in days
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Resolved application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Amounts strictly above this are accepted with an advisory flag
    pub large_amount_threshold: f64,
    /// Length of the trailing week window
    pub week_days: i64,
    /// Length of the trailing month window
    pub month_days: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            large_amount_threshold: DEFAULT_LARGE_AMOUNT_THRESHOLD,
            week_days: 7,
            month_days: 30,
        }
    }
}

impl AppConfig {
    /// Load from the default override location, falling back to embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit path, falling back to embedded defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse config from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("moneylytics").join("config").join("moneylytics.toml"))
}

fn load_config(override_path: Option<&Path>) -> Result<AppConfig> {
    let candidate = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    let content = match candidate {
        Some(path) if path.exists() => {
            debug!(path = %path.display(), "Loading config override");
            fs::read_to_string(&path)?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    intake: Option<RawIntake>,
    reports: Option<RawReports>,
}

#[derive(Debug, Deserialize)]
struct RawIntake {
    large_amount_threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawReports {
    week_days: Option<i64>,
    month_days: Option<i64>,
}

fn parse_config(content: &str) -> Result<AppConfig> {
    let raw: RawConfig = toml::from_str(content)?;
    let mut config = AppConfig::default();

    if let Some(intake) = raw.intake {
        if let Some(threshold) = intake.large_amount_threshold {
            if !threshold.is_finite() || threshold <= 0.0 {
                return Err(Error::InvalidData(format!(
                    "large_amount_threshold must be a positive number, got {}",
                    threshold
                )));
            }
            config.large_amount_threshold = threshold;
        }
    }

    if let Some(reports) = raw.reports {
        if let Some(days) = reports.week_days {
            config.week_days = positive_days("week_days", days)?;
        }
        if let Some(days) = reports.month_days {
            config.month_days = positive_days("month_days", days)?;
        }
    }

    Ok(config)
}

fn positive_days(key: &str, days: i64) -> Result<i64> {
    if !(1..=MAX_WINDOW_DAYS).contains(&days) {
        return Err(Error::InvalidData(format!(
            "{} must be between 1 and {}, got {}",
            key, MAX_WINDOW_DAYS, days
        )));
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = AppConfig::from_toml("[reports]\nweek_days = 14\n").unwrap();
        assert_eq!(config.week_days, 14);
        assert_eq!(config.month_days, 30);
        assert_eq!(config.large_amount_threshold, DEFAULT_LARGE_AMOUNT_THRESHOLD);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(AppConfig::from_toml("[reports]\nmonth_days = 0\n").is_err());
        assert!(AppConfig::from_toml("[intake]\nlarge_amount_threshold = -1.0\n").is_err());
        assert!(AppConfig::from_toml("not toml at all [").is_err());
    }

    #[test]
    fn test_window_days_upper_bound() {
        let at_cap = format!("[reports]\nmonth_days = {}\n", MAX_WINDOW_DAYS);
        assert_eq!(AppConfig::from_toml(&at_cap).unwrap().month_days, MAX_WINDOW_DAYS);

        let result = AppConfig::from_toml("[reports]\nweek_days = 1000000000\n");
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_load_from_missing_path_uses_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/moneylytics.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moneylytics.toml");
        fs::write(&path, "[intake]\nlarge_amount_threshold = 5000.0\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.large_amount_threshold, 5000.0);
    }
}
