//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `adpilot.toml` in the working directory unless another path is
//! given on the command line. Every field has a sensible default so the file
//! is optional. Environment variables take precedence over file values.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use adpilot_app::evaluation::DEFAULT_WRITE_TIMEOUT;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Evaluation scheduling and budget write limits.
    pub scheduler: SchedulerConfig,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Scheduler configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between two evaluation runs in `schedule` mode.
    pub interval_secs: u64,
    /// Upper bound for a single budget write, in seconds.
    pub write_timeout_secs: u64,
}

impl Config {
    /// Load configuration from `path` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("ADPILOT_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = lookup("ADPILOT_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("ADPILOT_INTERVAL_SECS") {
            self.scheduler.interval_secs = parse_secs("ADPILOT_INTERVAL_SECS", &val)?;
        }
        if let Some(val) = lookup("ADPILOT_WRITE_TIMEOUT_SECS") {
            self.scheduler.write_timeout_secs = parse_secs("ADPILOT_WRITE_TIMEOUT_SECS", &val)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "database url must not be empty".to_string(),
            ));
        }
        if self.scheduler.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "scheduler interval must be non-zero".to_string(),
            ));
        }
        if self.scheduler.write_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "write timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.interval_secs)
    }

    #[must_use]
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.scheduler.write_timeout_secs)
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| {
        ConfigError::Validation(format!("{key} must be a whole number of seconds, got {value:?}"))
    })
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:adpilot.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "adpilot=info,sqlx=warn".to_string(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3600,
            write_timeout_secs: DEFAULT_WRITE_TIMEOUT.as_secs(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.database.url, "sqlite:adpilot.db?mode=rwc");
        assert_eq!(config.interval(), Duration::from_secs(3600));
        assert_eq!(config.write_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_match_service_write_timeout_by_default() {
        assert_eq!(Config::default().write_timeout(), DEFAULT_WRITE_TIMEOUT);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.scheduler.interval_secs, 3600);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [scheduler]
            interval_secs = 900
            write_timeout_secs = 3
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.database_url(), "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.interval(), Duration::from_secs(900));
        assert_eq!(config.write_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [scheduler]
            interval_secs = 60
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.scheduler.interval_secs, 60);
        assert_eq!(config.scheduler.write_timeout_secs, 10);
        assert_eq!(config.database.url, "sqlite:adpilot.db?mode=rwc");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file(Path::new("nonexistent.toml")).unwrap();
        assert_eq!(config.scheduler.interval_secs, 3600);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_apply_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                ("ADPILOT_DATABASE_URL", "sqlite::memory:"),
                ("ADPILOT_LOG", "adpilot=debug"),
                ("ADPILOT_INTERVAL_SECS", " 120 "),
                ("ADPILOT_WRITE_TIMEOUT_SECS", "5"),
            ]))
            .unwrap();

        assert_eq!(config.database_url(), "sqlite::memory:");
        assert_eq!(config.logging.filter, "adpilot=debug");
        assert_eq!(config.scheduler.interval_secs, 120);
        assert_eq!(config.scheduler.write_timeout_secs, 5);
    }

    #[test]
    fn should_prefer_rust_log_over_adpilot_log() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[("ADPILOT_LOG", "info"), ("RUST_LOG", "trace")]))
            .unwrap();
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_reject_unparseable_interval() {
        let mut config = Config::default();
        let result = config.apply_overrides(env(&[("ADPILOT_INTERVAL_SECS", "hourly")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_zero_interval() {
        let mut config = Config::default();
        config.scheduler.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_write_timeout() {
        let mut config = Config::default();
        config.scheduler.write_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_empty_database_url() {
        let mut config = Config::default();
        config.database.url = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
