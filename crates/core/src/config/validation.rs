//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent`, `gnd_base_url`, or `sparql_endpoint` is empty
    /// - `cache_ttl_days` is less than 1
    /// - `sparql_pause_ms` exceeds 60 seconds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }
        if self.gnd_base_url.is_empty() {
            return Err(ConfigError::Invalid { field: "gnd_base_url".into(), reason: "must not be empty".into() });
        }
        if self.sparql_endpoint.is_empty() {
            return Err(ConfigError::Invalid { field: "sparql_endpoint".into(), reason: "must not be empty".into() });
        }

        if self.cache_ttl_days < 1 {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_days".into(),
                reason: "must be at least 1 day".into(),
            });
        }

        if self.sparql_pause_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "sparql_pause_ms".into(),
                reason: "must not exceed 60 seconds (60000ms)".into(),
            });
        }

        Ok(())
    }
}
