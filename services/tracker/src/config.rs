//! services/tracker/src/config.rs
//!
//! Defines the tracker's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub data_dir: PathBuf,
    pub namespace: String,
    pub log_level: Level,
    pub default_rest_secs: u32,
    pub tick_interval: Duration,
    pub chat_reply_delay: Duration,
    /// Offset applied to "now" before calendar-day statistics are computed.
    pub utc_offset: FixedOffset,
    pub export_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            namespace: "fitnesspro".to_string(),
            log_level: Level::INFO,
            default_rest_secs: 90,
            tick_interval: Duration::from_millis(1000),
            chat_reply_delay: Duration::from_millis(1000),
            utc_offset: Utc.fix(),
            export_path: None,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup. Unset
    /// variables take their defaults; set but unparsable ones are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // --- Storage Settings ---
        let data_dir = lookup("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let namespace = lookup("STORAGE_NAMESPACE").unwrap_or(defaults.namespace);
        if namespace.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "STORAGE_NAMESPACE".to_string(),
                "the namespace must not be empty".to_string(),
            ));
        }

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Session Timing ---
        let default_rest_secs =
            parse_var(&lookup, "DEFAULT_REST_SECONDS")?.unwrap_or(defaults.default_rest_secs);
        let tick_interval = match parse_var::<u64>(&lookup, "TICK_INTERVAL_MS")? {
            Some(0) => {
                return Err(ConfigError::InvalidValue(
                    "TICK_INTERVAL_MS".to_string(),
                    "the tick interval must be positive".to_string(),
                ))
            }
            Some(ms) => Duration::from_millis(ms),
            None => defaults.tick_interval,
        };
        let chat_reply_delay = parse_var(&lookup, "CHAT_REPLY_DELAY_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.chat_reply_delay);

        let utc_offset = match parse_var::<i32>(&lookup, "UTC_OFFSET_MINUTES")? {
            Some(minutes) => minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "UTC_OFFSET_MINUTES".to_string(),
                        format!("{} minutes is out of range", minutes),
                    )
                })?,
            None => defaults.utc_offset,
        };

        let export_path = lookup("EXPORT_PATH").map(PathBuf::from);

        Ok(Self {
            data_dir,
            namespace,
            log_level,
            default_rest_secs,
            tick_interval,
            chat_reply_delay,
            utc_offset,
            export_path,
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
        })
        .transpose()
}
