// src/config.rs

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    backup::RetentionPolicy,
    constants::{
        APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_MAX_BACKUPS, DEFAULT_RETENTION_DAYS,
        ENV_DATA_DIR, ENV_MAX_BACKUPS, ENV_RETENTION_DAYS, MAX_RETENTION_DAYS,
        MIN_RETENTION_DAYS,
    },
    errors::ConfigError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Root of everything the tool persists; backups live under `backups/`.
    pub data_dir: PathBuf,
    pub retention_days: i64,
    pub max_backups: usize,
}

/// Optional overrides read from `config.json` in the data directory.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ConfigFile {
    retention_days: Option<i64>,
    max_backups: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            retention_days: DEFAULT_RETENTION_DAYS,
            max_backups: DEFAULT_MAX_BACKUPS,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

impl AppConfig {
    /// Defaults, then `config.json`, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    /// Same as [`AppConfig::load`] with a custom environment lookup.
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(dir) = env(ENV_DATA_DIR).filter(|d| !d.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        config.apply_file(&config.data_dir.join(CONFIG_FILE_NAME))?;

        if let Some(value) = env(ENV_RETENTION_DAYS) {
            config.retention_days = parse_env(ENV_RETENTION_DAYS, value)?;
        }
        if let Some(value) = env(ENV_MAX_BACKUPS) {
            config.max_backups = parse_env(ENV_MAX_BACKUPS, value)?;
        }
        config.validate()?;

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        if !path.is_file() {
            return Ok(());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(days) = file.retention_days {
            self.retention_days = days;
        }
        if let Some(max) = file.max_backups {
            self.max_backups = max;
        }
        Ok(())
    }

    /// Rejects limits that would make cleanup drop fresh or active backups.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_RETENTION_DAYS..=MAX_RETENTION_DAYS).contains(&self.retention_days) {
            return Err(ConfigError::OutOfRange {
                name: "retention days",
                value: self.retention_days,
                min: MIN_RETENTION_DAYS,
                max: MAX_RETENTION_DAYS,
            });
        }
        if self.max_backups == 0 {
            return Err(ConfigError::OutOfRange {
                name: "max backups",
                value: 0,
                min: 1,
                max: i64::MAX,
            });
        }
        Ok(())
    }

    /// Out-of-range retention is clamped; [`AppConfig::validate`] reports it.
    pub fn retention_policy(&self) -> RetentionPolicy {
        let days = self
            .retention_days
            .clamp(MIN_RETENTION_DAYS, MAX_RETENTION_DAYS);
        RetentionPolicy {
            max_age: Duration::try_days(days)
                .unwrap_or_else(|| Duration::days(DEFAULT_RETENTION_DAYS)),
            max_entries: self.max_backups.max(1),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { name, value })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tempfile::tempdir;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().to_string_lossy().to_string();
        let config = AppConfig::load_with(env_of(&[(ENV_DATA_DIR, &data_dir)])).unwrap();

        assert_eq!(config.data_dir, dir.path());
        assert_eq!(config.retention_days, 30);
        assert_eq!(config.max_backups, 100);
        assert_eq!(config.retention_policy(), RetentionPolicy::default());
    }

    #[test]
    fn test_file_then_env_override() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{"retentionDays": 7, "maxBackups": 20}"#,
        )
        .unwrap();
        let data_dir = dir.path().to_string_lossy().to_string();

        let from_file = AppConfig::load_with(env_of(&[(ENV_DATA_DIR, &data_dir)])).unwrap();
        assert_eq!(from_file.retention_days, 7);
        assert_eq!(from_file.max_backups, 20);

        let from_env = AppConfig::load_with(env_of(&[
            (ENV_DATA_DIR, &data_dir),
            (ENV_MAX_BACKUPS, "5"),
        ]))
        .unwrap();
        assert_eq!(from_env.retention_days, 7);
        assert_eq!(from_env.max_backups, 5);
        assert_eq!(from_env.retention_policy().max_age, Duration::days(7));
    }

    #[test]
    fn test_invalid_sources_are_errors() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().to_string_lossy().to_string();

        let err = AppConfig::load_with(env_of(&[
            (ENV_DATA_DIR, &data_dir),
            (ENV_RETENTION_DAYS, "a month"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name, .. } if name == ENV_RETENTION_DAYS));

        fs::write(dir.path().join("config.json"), r#"{"maxBackups": -1}"#).unwrap();
        let err = AppConfig::load_with(env_of(&[(ENV_DATA_DIR, &data_dir)])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_retention_out_of_range_is_rejected() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().to_string_lossy().to_string();

        for days in ["9223372036854775807", "-5", "0"] {
            let err = AppConfig::load_with(env_of(&[
                (ENV_DATA_DIR, &data_dir),
                (ENV_RETENTION_DAYS, days),
            ]))
            .unwrap_err();
            assert!(
                matches!(err, ConfigError::OutOfRange { .. }),
                "days: {}",
                days
            );
        }

        fs::write(dir.path().join("config.json"), r#"{"maxBackups": 0}"#).unwrap();
        let err = AppConfig::load_with(env_of(&[(ENV_DATA_DIR, &data_dir)])).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { value: 0, .. }));
    }

    #[test]
    fn test_retention_policy_never_panics() {
        let mut config = AppConfig {
            data_dir: PathBuf::from("."),
            retention_days: i64::MAX,
            max_backups: 100,
        };
        assert!(config.validate().is_err());
        assert_eq!(
            config.retention_policy().max_age,
            Duration::days(MAX_RETENTION_DAYS)
        );

        config.retention_days = -5;
        assert_eq!(
            config.retention_policy().max_age,
            Duration::days(MIN_RETENTION_DAYS)
        );
    }
}
