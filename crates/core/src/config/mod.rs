//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (EPISTOLA_*)
//! 2. TOML config file (if EPISTOLA_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Configuration for the enrichment pipeline.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (EPISTOLA_*)
/// 2. TOML config file (if EPISTOLA_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the GND lookup service.
    ///
    /// Set via EPISTOLA_GND_BASE_URL environment variable.
    #[serde(default = "default_gnd_base_url")]
    pub gnd_base_url: String,

    /// SPARQL endpoint used for coordinate resolution.
    ///
    /// Set via EPISTOLA_SPARQL_ENDPOINT environment variable.
    #[serde(default = "default_sparql_endpoint")]
    pub sparql_endpoint: String,

    /// User-Agent string for outbound requests.
    ///
    /// Set via EPISTOLA_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via EPISTOLA_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Path to the SQLite database backing the persistent cache tier.
    ///
    /// Set via EPISTOLA_CACHE_DB_PATH environment variable.
    #[serde(default = "default_cache_db_path")]
    pub cache_db_path: PathBuf,

    /// Cache entry lifetime in days, both tiers.
    ///
    /// Set via EPISTOLA_CACHE_TTL_DAYS environment variable.
    #[serde(default = "default_cache_ttl_days")]
    pub cache_ttl_days: i64,

    /// Minimum pause between SPARQL chunk requests in milliseconds.
    ///
    /// Set via EPISTOLA_SPARQL_PAUSE_MS environment variable.
    #[serde(default = "default_sparql_pause_ms")]
    pub sparql_pause_ms: u64,
}

fn default_gnd_base_url() -> String {
    "https://lobid.org/gnd".into()
}

fn default_sparql_endpoint() -> String {
    "https://query.wikidata.org/sparql".into()
}

fn default_user_agent() -> String {
    "epistola/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_cache_db_path() -> PathBuf {
    PathBuf::from("./epistola-cache.sqlite")
}

fn default_cache_ttl_days() -> i64 {
    7
}

fn default_sparql_pause_ms() -> u64 {
    1_500
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gnd_base_url: default_gnd_base_url(),
            sparql_endpoint: default_sparql_endpoint(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            cache_db_path: default_cache_db_path(),
            cache_ttl_days: default_cache_ttl_days(),
            sparql_pause_ms: default_sparql_pause_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache TTL in milliseconds, matching the cache store's unit.
    pub fn cache_ttl_ms(&self) -> i64 {
        self.cache_ttl_days * 24 * 60 * 60 * 1000
    }

    /// Pause between SPARQL chunk requests.
    pub fn sparql_pause(&self) -> Duration {
        Duration::from_millis(self.sparql_pause_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `EPISTOLA_`
    /// 2. TOML file from `EPISTOLA_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("EPISTOLA_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("EPISTOLA_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
