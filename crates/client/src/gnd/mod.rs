//! GND authority resolver against the lobid.org lookup service.
//!
//! Resolves one GND identifier (possibly embedded in a URI) to a normalized
//! [`AuthorityRecord`]:
//!
//! - **Endpoint**: `GET {base}/{id}.json`
//! - **Caching**: session tier keyed by bare id, 404 responses cached as a
//!   negative marker so known-absent identifiers are not re-queried before
//!   TTL expiry.
//! - **Failure policy**: transient failures (non-404 errors, timeouts,
//!   malformed bodies) are logged and surfaced as `None`, never cached, so a
//!   later call retries naturally. The resolver does not throw.

pub mod error;
pub mod format;
pub mod response;

pub use error::GndError;
pub use format::{ExternalLink, external_links, format_lifespan, format_places};
pub use response::{AuthorityRecord, GndApiResponse};

use epistola_core::AppConfig;
use epistola_core::cache::{CacheStore, Lookup};
use regex::Regex;
use reqwest::StatusCode;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

/// Default base URL of the lobid.org GND service.
const DEFAULT_BASE_URL: &str = "https://lobid.org/gnd";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "epistola/0.1";

/// Session cache namespace for authority records.
pub const CACHE_NAMESPACE: &str = "ce-enriched";

/// Bare GND id at the end of a d-nb.info URI, or standing alone.
/// GND ids are digit runs with an optional trailing check character X.
static GND_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:d-nb\.info/gnd/|^)(\d+[0-9X]?)$").expect("valid regex"));

/// Extract the bare GND id from arbitrary URI forms.
///
/// Accepts `http://d-nb.info/gnd/<id>`, `https://…`, scheme-relative
/// `//d-nb.info/gnd/<id>`, or a bare `<id>`. Anything else yields `None`.
pub fn extract_gnd_id(identifier_or_uri: &str) -> Option<String> {
    GND_ID.captures(identifier_or_uri).map(|caps| caps[1].to_string())
}

/// GND client configuration.
#[derive(Debug, Clone)]
pub struct GndConfig {
    /// Base URL (default: https://lobid.org/gnd).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string.
    pub user_agent: String,
}

impl Default for GndConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for GndConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.gnd_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// GND authority resolver with session-tier caching.
#[derive(Debug, Clone)]
pub struct GndClient {
    http: reqwest::Client,
    config: GndConfig,
    cache: CacheStore,
}

impl GndClient {
    /// Create a new client over the given cache store.
    pub fn new(config: GndConfig, cache: CacheStore) -> Result<Self, GndError> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .build()
            .map_err(|e| GndError::Network(Arc::new(e)))?;

        Ok(Self { http, config, cache })
    }

    /// Resolve one GND identifier to a normalized record.
    ///
    /// Returns `None` for unrecognized identifiers (no network call), cached
    /// negative results, remote not-found, and transient failures. The
    /// caller treats `None` as "enrichment unavailable for now."
    pub async fn resolve(&self, identifier_or_uri: &str) -> Option<AuthorityRecord> {
        let gnd_id = extract_gnd_id(identifier_or_uri)?;

        match self.cache.get::<AuthorityRecord>(&gnd_id).await {
            Some(Lookup::Found(record)) => return Some(record),
            Some(Lookup::NotFound) => return None,
            None => {}
        }

        match self.fetch(&gnd_id).await {
            Ok(Some(raw)) => {
                let record = AuthorityRecord::from_response(gnd_id.clone(), raw);
                self.cache.put(&gnd_id, &record).await;
                Some(record)
            }
            Ok(None) => {
                self.cache.put_negative(&gnd_id).await;
                None
            }
            Err(e) => {
                tracing::warn!(gnd_id = %gnd_id, error = %e, "GND enrichment failed");
                None
            }
        }
    }

    /// One network round trip. `Ok(None)` means the service reported the id
    /// as not found; other non-success statuses are errors.
    async fn fetch(&self, gnd_id: &str) -> Result<Option<GndApiResponse>, GndError> {
        let url = format!("{}/{gnd_id}.json", self.config.base_url);
        tracing::debug!(%url, "fetching GND record");

        let response = self.http.get(&url).header("Accept", "application/json").send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(GndError::HttpError { status: status.as_u16() });
        }

        let bytes = response.bytes().await?;
        let raw = serde_json::from_slice(&bytes).map_err(|e| GndError::Parse(e.to_string()))?;
        Ok(Some(raw))
    }

    /// Drop all cached authority records, including negative markers.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &GndConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epistola_core::cache::DEFAULT_TTL_MS;

    fn offline_client() -> GndClient {
        // Unroutable base URL: any accidental network attempt fails fast.
        let config = GndConfig { base_url: "http://127.0.0.1:1/gnd".to_string(), ..Default::default() };
        GndClient::new(config, CacheStore::session(CACHE_NAMESPACE, DEFAULT_TTL_MS)).unwrap()
    }

    #[test]
    fn test_extract_from_http_uri() {
        assert_eq!(extract_gnd_id("http://d-nb.info/gnd/118540238").as_deref(), Some("118540238"));
    }

    #[test]
    fn test_extract_from_https_uri() {
        assert_eq!(extract_gnd_id("https://d-nb.info/gnd/118540238").as_deref(), Some("118540238"));
    }

    #[test]
    fn test_extract_from_scheme_relative_uri() {
        assert_eq!(extract_gnd_id("//d-nb.info/gnd/118540238").as_deref(), Some("118540238"));
    }

    #[test]
    fn test_extract_bare_id() {
        assert_eq!(extract_gnd_id("118540238").as_deref(), Some("118540238"));
    }

    #[test]
    fn test_extract_check_character() {
        assert_eq!(extract_gnd_id("11854023X").as_deref(), Some("11854023X"));
        assert_eq!(extract_gnd_id("11854023x").as_deref(), Some("11854023x"));
    }

    #[test]
    fn test_extract_rejects_garbage() {
        assert!(extract_gnd_id("").is_none());
        assert!(extract_gnd_id("goethe").is_none());
        assert!(extract_gnd_id("X118540238").is_none());
        assert!(extract_gnd_id("http://example.com/118540238x7").is_none());
    }

    #[tokio::test]
    async fn test_unrecognized_identifier_short_circuits() {
        let client = offline_client();
        assert!(client.resolve("not-a-gnd-id").await.is_none());
        assert!(client.resolve("").await.is_none());
    }

    #[tokio::test]
    async fn test_cached_record_returned_without_network() {
        let client = offline_client();
        let record = AuthorityRecord {
            gnd_id: "118540238".to_string(),
            preferred_name: Some("Goethe, Johann Wolfgang von".to_string()),
            ..Default::default()
        };
        client.cache.put("118540238", &record).await;

        let got = client.resolve("http://d-nb.info/gnd/118540238").await;
        assert_eq!(got, Some(record));
    }

    #[tokio::test]
    async fn test_cached_negative_returns_none_without_network() {
        let client = offline_client();
        client.cache.put_negative("999999999").await;

        assert!(client.resolve("999999999").await.is_none());
    }

    #[tokio::test]
    async fn test_transient_failure_is_not_cached() {
        let client = offline_client();

        // Connection refused: a transient failure, surfaced as None...
        assert!(client.resolve("118540238").await.is_none());
        // ...and not recorded, so the identifier stays unknown rather than
        // negatively cached.
        assert_eq!(client.cache.get::<AuthorityRecord>("118540238").await, None);
    }

    #[tokio::test]
    async fn test_clear_cache_forgets_records() {
        let client = offline_client();
        client.cache.put_negative("1").await;
        client.clear_cache().await;

        assert_eq!(client.cache.get::<AuthorityRecord>("1").await, None);
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig::default();
        let config = GndConfig::from(&app);
        assert_eq!(config.base_url, "https://lobid.org/gnd");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
