//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `ALIFI_SETTLE_TIMEOUT_MS` - Upper bound on waiting for an
//!   identity-change notification during provisioning (default: 5000)
//! - `ALIFI_BROADCAST_BATCH_SIZE` - Users per broadcast batch write
//!   (default: 10, must be at least 1)
//! - `ALIFI_MAX_ADVERTISEMENTS` - Ceiling on stored advertisements
//!   (default: 10)

use std::time::Duration;

use thiserror::Error;

const DEFAULT_SETTLE_TIMEOUT_MS: u64 = 5000;
const DEFAULT_BROADCAST_BATCH_SIZE: usize = 10;
const DEFAULT_MAX_ADVERTISEMENTS: usize = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Console tuning configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Upper bound on waiting for the identity-change stream to settle
    /// during account provisioning.
    pub settle_timeout: Duration,
    /// Number of users addressed by each atomic broadcast batch write.
    pub broadcast_batch_size: usize,
    /// Maximum number of advertisements the platform will store.
    pub max_advertisements: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            settle_timeout: Duration::from_millis(DEFAULT_SETTLE_TIMEOUT_MS),
            broadcast_batch_size: DEFAULT_BROADCAST_BATCH_SIZE,
            max_advertisements: DEFAULT_MAX_ADVERTISEMENTS,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from environment variables (and `.env` if present),
    /// falling back to defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a set variable does not parse
    /// or fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let settle_timeout = Duration::from_millis(parse_var(
            "ALIFI_SETTLE_TIMEOUT_MS",
            DEFAULT_SETTLE_TIMEOUT_MS,
        )?);
        let broadcast_batch_size = parse_var(
            "ALIFI_BROADCAST_BATCH_SIZE",
            DEFAULT_BROADCAST_BATCH_SIZE,
        )?;
        let max_advertisements =
            parse_var("ALIFI_MAX_ADVERTISEMENTS", DEFAULT_MAX_ADVERTISEMENTS)?;

        if broadcast_batch_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "ALIFI_BROADCAST_BATCH_SIZE".to_owned(),
                "must be at least 1".to_owned(),
            ));
        }

        Ok(Self {
            settle_timeout,
            broadcast_batch_size,
            max_advertisements,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar(name.to_owned(), format!("got {raw:?}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.settle_timeout, Duration::from_secs(5));
        assert_eq!(config.broadcast_batch_size, 10);
        assert_eq!(config.max_advertisements, 10);
    }

    #[test]
    fn test_parse_var_falls_back() {
        // Variable not set in the test environment
        let v: u64 = parse_var("ALIFI_DOES_NOT_EXIST", 7).expect("default");
        assert_eq!(v, 7);
    }
}
