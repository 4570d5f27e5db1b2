use config::ConfigError;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

use crate::resync::ResyncConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database_url: String,
    pub resync_enabled: bool,
    pub resync_interval_secs: u64,
    pub resync_rollback_hours: i64,
    pub resync_run_on_start: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "postgresql://localhost/settlement".to_string()),
            resync_enabled: parse_var(&lookup, "RESYNC_ENABLED", true)?,
            resync_interval_secs: parse_var(&lookup, "RESYNC_INTERVAL_SECS", 3600)?,
            resync_rollback_hours: parse_var(&lookup, "RESYNC_ROLLBACK_HOURS", 24)?,
            resync_run_on_start: parse_var(&lookup, "RESYNC_RUN_ON_START", true)?,
        };

        if config.resync_interval_secs == 0 {
            return Err(ConfigError::Message(
                "RESYNC_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }
        if config.resync_rollback_hours < 0 {
            return Err(ConfigError::Message(
                "RESYNC_ROLLBACK_HOURS cannot be negative".to_string(),
            ));
        }
        if chrono::Duration::try_hours(config.resync_rollback_hours).is_none() {
            return Err(ConfigError::Message(format!(
                "RESYNC_ROLLBACK_HOURS={} is out of range",
                config.resync_rollback_hours
            )));
        }

        Ok(config)
    }

    pub fn resync(&self) -> ResyncConfig {
        ResyncConfig {
            interval: Duration::from_secs(self.resync_interval_secs),
            // Range is checked in from_lookup; saturate for hand-built configs
            rollback_margin: chrono::Duration::try_hours(self.resync_rollback_hours)
                .unwrap_or(chrono::Duration::MAX),
            run_on_start: self.resync_run_on_start,
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::Message(format!("invalid {}={:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}
