//! Configuration module for watson-tray.
//!
//! This module handles parsing configuration from environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `WATSON_TRAY_WATSON_BIN` | No | autodetected | Path to the watson binary |
//! | `WATSON_TRAY_POLL_INTERVAL_SECS` | No | 5 | Seconds between status polls |
//! | `WATSON_TRAY_REMINDER_INTERVAL_SECS` | No | 30 | Seconds between reminder checks |
//! | `WATSON_TRAY_IDLE_THRESHOLD_SECS` | No | 300 | Idle time before a reminder is due |
//! | `WATSON_TRAY_COOLDOWN_SECS` | No | 300 | Minimum spacing between reminders |
//!
//! The watson binary is autodetected from the usual Homebrew locations and
//! falls back to `watson` on `PATH`; see [`crate::watson::default_watson_bin`].

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::reminder::ReminderPolicy;
use crate::watson::default_watson_bin;

/// Default seconds between status polls.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Default seconds between reminder checks.
const DEFAULT_REMINDER_INTERVAL_SECS: u64 = 30;

/// Default idle time (seconds) before a reminder is due.
const DEFAULT_IDLE_THRESHOLD_SECS: u64 = 300;

/// Default minimum spacing (seconds) between consecutive reminders.
const DEFAULT_COOLDOWN_SECS: u64 = 300;

/// Errors that can occur during configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has an invalid value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Configuration for the watson-tray agent.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the watson binary.
    pub watson_bin: PathBuf,

    /// Interval between status polls.
    pub poll_interval: Duration,

    /// Interval between reminder checks.
    pub reminder_interval: Duration,

    /// Idle threshold and cooldown for the reminder state machine.
    pub reminder_policy: ReminderPolicy,
}

impl Config {
    /// Creates a new `Config` by parsing environment variables.
    ///
    /// All variables are optional; defaults match the behavior documented
    /// in the module-level table.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if any interval variable is set but is not
    /// a positive integer number of seconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        let watson_bin = env::var("WATSON_TRAY_WATSON_BIN")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_watson_bin());

        let poll_interval = Duration::from_secs(parse_secs(
            "WATSON_TRAY_POLL_INTERVAL_SECS",
            DEFAULT_POLL_INTERVAL_SECS,
        )?);

        let reminder_interval = Duration::from_secs(parse_secs(
            "WATSON_TRAY_REMINDER_INTERVAL_SECS",
            DEFAULT_REMINDER_INTERVAL_SECS,
        )?);

        let idle_threshold_secs = parse_secs(
            "WATSON_TRAY_IDLE_THRESHOLD_SECS",
            DEFAULT_IDLE_THRESHOLD_SECS,
        )?;

        let cooldown_secs = parse_secs("WATSON_TRAY_COOLDOWN_SECS", DEFAULT_COOLDOWN_SECS)?;

        Ok(Self {
            watson_bin,
            poll_interval,
            reminder_interval,
            reminder_policy: ReminderPolicy::from_secs(idle_threshold_secs, cooldown_secs),
        })
    }
}

/// Parses an optional positive-seconds environment variable.
fn parse_secs(key: &str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(val) => {
            let secs = val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("expected positive integer, got '{val}'"),
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
            Ok(secs)
        }
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    /// Helper to run tests with isolated environment variables.
    /// Clears all WATSON_TRAY_* vars before the test and restores them after.
    fn with_clean_env<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let saved_vars: Vec<(String, String)> = env::vars()
            .filter(|(k, _)| k.starts_with("WATSON_TRAY_"))
            .collect();

        for (key, _) in &saved_vars {
            env::remove_var(key);
        }

        let result = f();

        for (key, value) in saved_vars {
            env::set_var(key, value);
        }

        result
    }

    #[test]
    #[serial]
    fn default_config() {
        with_clean_env(|| {
            let config = Config::from_env().expect("should parse empty environment");

            assert_eq!(config.poll_interval, Duration::from_secs(5));
            assert_eq!(config.reminder_interval, Duration::from_secs(30));
            assert_eq!(
                config.reminder_policy.idle_threshold,
                chrono::Duration::seconds(300)
            );
            assert_eq!(
                config.reminder_policy.cooldown,
                chrono::Duration::seconds(300)
            );
            assert!(!config.watson_bin.as_os_str().is_empty());
        });
    }

    #[test]
    #[serial]
    fn full_config() {
        with_clean_env(|| {
            env::set_var("WATSON_TRAY_WATSON_BIN", "/custom/bin/watson");
            env::set_var("WATSON_TRAY_POLL_INTERVAL_SECS", "10");
            env::set_var("WATSON_TRAY_REMINDER_INTERVAL_SECS", "60");
            env::set_var("WATSON_TRAY_IDLE_THRESHOLD_SECS", "600");
            env::set_var("WATSON_TRAY_COOLDOWN_SECS", "900");

            let config = Config::from_env().expect("should parse full config");

            assert_eq!(config.watson_bin, PathBuf::from("/custom/bin/watson"));
            assert_eq!(config.poll_interval, Duration::from_secs(10));
            assert_eq!(config.reminder_interval, Duration::from_secs(60));
            assert_eq!(
                config.reminder_policy.idle_threshold,
                chrono::Duration::seconds(600)
            );
            assert_eq!(
                config.reminder_policy.cooldown,
                chrono::Duration::seconds(900)
            );
        });
    }

    #[test]
    #[serial]
    fn invalid_poll_interval() {
        with_clean_env(|| {
            env::set_var("WATSON_TRAY_POLL_INTERVAL_SECS", "not-a-number");

            let result = Config::from_env();
            assert!(result.is_err());

            let err = result.unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue { ref key, .. } if key == "WATSON_TRAY_POLL_INTERVAL_SECS"
            ));
        });
    }

    #[test]
    #[serial]
    fn zero_interval_rejected() {
        with_clean_env(|| {
            env::set_var("WATSON_TRAY_IDLE_THRESHOLD_SECS", "0");

            let result = Config::from_env();
            assert!(result.is_err());

            let err = result.unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue { ref key, ref message }
                    if key == "WATSON_TRAY_IDLE_THRESHOLD_SECS"
                    && message.contains("greater than 0")
            ));
        });
    }

    #[test]
    #[serial]
    fn negative_interval_rejected() {
        with_clean_env(|| {
            env::set_var("WATSON_TRAY_COOLDOWN_SECS", "-5");

            let result = Config::from_env();
            assert!(result.is_err());
        });
    }
}
