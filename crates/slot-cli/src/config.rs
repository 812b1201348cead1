//! Optional TOML configuration for `slotfinder`.
//!
//! ```toml
//! [engine]
//! timezone = "Asia/Tokyo"
//! min_duration_minutes = 30
//! ```
//!
//! Command-line flags take precedence over the file; without either the
//! reference zone is UTC and there is no minimum duration.

use std::path::Path;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use slot_engine::parse::parse_timezone;

const DEFAULT_TIMEZONE: &str = "UTC";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// IANA name of the reference zone for bare dates and date labels.
    pub timezone: Option<String>,
    /// Minimum slot length used when a request does not specify one.
    pub min_duration_minutes: Option<i64>,
}

impl CliConfig {
    /// Load the config file at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: CliConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(name) = &self.engine.timezone {
            parse_timezone(name).context("Invalid [engine].timezone")?;
        }
        Ok(())
    }

    /// Resolve the reference zone, preferring a command-line override.
    pub fn timezone(&self, flag: Option<&str>) -> Result<Tz> {
        let name = flag
            .or(self.engine.timezone.as_deref())
            .unwrap_or(DEFAULT_TIMEZONE);
        parse_timezone(name).with_context(|| format!("Unknown timezone: '{}'", name))
    }

    /// Resolve the minimum duration: explicit value, then config, then none.
    pub fn min_duration(&self, explicit: Option<i64>) -> i64 {
        explicit.or(self.engine.min_duration_minutes).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_utc_and_no_minimum() {
        let config = CliConfig::default();
        assert_eq!(config.timezone(None).unwrap(), chrono_tz::UTC);
        assert_eq!(config.min_duration(None), 0);
    }

    #[test]
    fn file_values_apply_unless_overridden() {
        let config: CliConfig = toml::from_str(
            r#"
            [engine]
            timezone = "Asia/Tokyo"
            min_duration_minutes = 45
            "#,
        )
        .unwrap();

        assert_eq!(config.timezone(None).unwrap(), chrono_tz::Asia::Tokyo);
        assert_eq!(config.timezone(Some("UTC")).unwrap(), chrono_tz::UTC);
        assert_eq!(config.min_duration(None), 45);
        assert_eq!(config.min_duration(Some(15)), 15);
    }

    #[test]
    fn empty_file_is_valid() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn invalid_timezone_fails_validation() {
        let config: CliConfig = toml::from_str("[engine]\ntimezone = \"Nowhere/City\"\n").unwrap();
        assert!(config.validate().is_err());
    }
}
