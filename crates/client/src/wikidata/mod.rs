//! Coordinate resolver over the Wikidata SPARQL endpoint.
//!
//! Translates GeoNames place identifiers into geocoordinates using Wikidata
//! as intermediary: GeoNames id (P1566) to coordinate location (P625).
//!
//! ### Specification
//!
//! - **Endpoint**: `https://query.wikidata.org/sparql`, GET with
//!   `query`/`format=json` parameters.
//! - **Batching**: `VALUES`-based filter, at most 50 identifiers per query.
//! - **Rate limiting**: chunks run strictly in sequence with at least 1.5s
//!   between requests (Wikidata's single-request-per-second guidance), no
//!   trailing delay after the last chunk.
//! - **Caching**: persistent tier keyed by place id; identifiers the remote
//!   store doesn't know are not negatively cached and retry on every call.
//! - **Failure policy**: a failed chunk is logged and contributes nothing,
//!   the remaining chunks still run.

pub mod error;
pub mod response;

pub use error::SparqlError;
pub use response::{PlaceCoordinate, SparqlBinding, SparqlResponse};

use epistola_core::AppConfig;
use epistola_core::cache::{CacheStore, Lookup};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Default SPARQL endpoint.
const DEFAULT_ENDPOINT: &str = "https://query.wikidata.org/sparql";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "epistola/0.1";

/// Minimum interval between chunk requests.
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(1500);

/// Maximum identifiers per `VALUES` clause, the endpoint's query-size guidance.
pub const MAX_BATCH_SIZE: usize = 50;

/// Persistent cache namespace for place coordinates.
pub const CACHE_NAMESPACE: &str = "geonames-coordinates";

/// Progress callback: (identifiers resolved so far, identifiers submitted).
pub type ProgressFn<'a> = &'a mut dyn FnMut(usize, usize);

/// SPARQL client configuration.
#[derive(Debug, Clone)]
pub struct SparqlConfig {
    /// Endpoint URL (default: https://query.wikidata.org/sparql).
    pub endpoint: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string.
    pub user_agent: String,
    /// Minimum interval between chunk requests (default: 1.5s).
    pub min_request_interval: Duration,
}

impl Default for SparqlConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            min_request_interval: MIN_REQUEST_INTERVAL,
        }
    }
}

impl From<&AppConfig> for SparqlConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            endpoint: config.sparql_endpoint.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            min_request_interval: config.sparql_pause(),
        }
    }
}

/// Rate limiter to enforce request intervals.
#[derive(Debug)]
struct RateLimiter {
    last_request: Mutex<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(Instant::now().checked_sub(min_interval).unwrap_or_else(Instant::now)),
            min_interval,
        }
    }

    /// Acquire permission to make a request, waiting if necessary.
    async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            tokio::time::sleep(self.min_interval - elapsed).await;
        }
        *last = Instant::now();
    }
}

/// Batched coordinate resolver with persistent caching.
#[derive(Debug, Clone)]
pub struct WikidataClient {
    http: reqwest::Client,
    config: SparqlConfig,
    cache: CacheStore,
    rate_limiter: Arc<RateLimiter>,
}

impl WikidataClient {
    /// Create a new client over the given cache store.
    pub fn new(config: SparqlConfig, cache: CacheStore) -> Result<Self, SparqlError> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .build()
            .map_err(|e| SparqlError::Network(Arc::new(e)))?;

        let rate_limiter = Arc::new(RateLimiter::new(config.min_request_interval));

        Ok(Self { http, config, cache, rate_limiter })
    }

    /// Resolve a set of place identifiers to coordinates.
    ///
    /// Cached identifiers are answered before any network activity and
    /// reported through `on_progress` first. The rest is queried in
    /// sequential chunks; after every chunk `on_progress` receives the
    /// cumulative resolved count against the submitted total. Identifiers
    /// the remote store doesn't know are simply absent from the result.
    ///
    /// Never fails: a chunk-level error costs only that chunk's results.
    pub async fn resolve_batch(
        &self, place_ids: &[String], mut on_progress: Option<ProgressFn<'_>>,
    ) -> HashMap<String, PlaceCoordinate> {
        let total = place_ids.len();
        let mut results: HashMap<String, PlaceCoordinate> = HashMap::new();
        let mut uncached: Vec<String> = Vec::new();

        for id in place_ids {
            match self.cache.get::<PlaceCoordinate>(id).await {
                Some(Lookup::Found(mut coord)) => {
                    // place_id travels in the cache key, not the payload.
                    coord.place_id = id.clone();
                    results.insert(id.clone(), coord);
                }
                _ => uncached.push(id.clone()),
            }
        }

        if !results.is_empty()
            && let Some(progress) = on_progress.as_mut()
        {
            progress(results.len(), total);
        }

        for chunk in uncached.chunks(MAX_BATCH_SIZE) {
            self.rate_limiter.acquire().await;

            match self.query_chunk(chunk).await {
                Ok(chunk_results) => {
                    for (id, coord) in chunk_results {
                        self.cache.put(&id, &coord).await;
                        results.insert(id, coord);
                    }
                }
                Err(e) => {
                    tracing::warn!(chunk_size = chunk.len(), error = %e, "coordinate chunk failed, continuing");
                }
            }

            if let Some(progress) = on_progress.as_mut() {
                progress(results.len(), total);
            }
        }

        results
    }

    /// One federated query for at most [`MAX_BATCH_SIZE`] identifiers.
    async fn query_chunk(&self, place_ids: &[String]) -> Result<HashMap<String, PlaceCoordinate>, SparqlError> {
        let query = build_chunk_query(place_ids);
        tracing::debug!(ids = place_ids.len(), "querying coordinates");

        let response = self
            .http
            .get(&self.config.endpoint)
            .query(&[("query", query.as_str()), ("format", "json")])
            .header("Accept", "application/sparql-results+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SparqlError::HttpError { status: status.as_u16() });
        }

        let bytes = response.bytes().await?;
        let parsed: SparqlResponse = serde_json::from_slice(&bytes).map_err(|e| SparqlError::Parse(e.to_string()))?;

        let mut chunk_results = HashMap::new();
        for binding in parsed.results.bindings {
            if let Some(coord) = binding.into_coordinate() {
                chunk_results.insert(coord.place_id.clone(), coord);
            }
        }
        Ok(chunk_results)
    }

    /// Drop all cached coordinates.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &SparqlConfig {
        &self.config
    }
}

/// SPARQL text for one chunk: a `VALUES` filter over the chunk's GeoNames
/// ids, requesting coordinates plus an English/German label pair.
fn build_chunk_query(place_ids: &[String]) -> String {
    let values = place_ids.iter().map(|id| format!("\"{id}\"")).collect::<Vec<_>>().join(" ");

    format!(
        "SELECT ?geonamesId ?lat ?lon ?label ?labelDe WHERE {{\n\
         \x20 VALUES ?geonamesId {{ {values} }}\n\
         \x20 ?place wdt:P1566 ?geonamesId .\n\
         \x20 ?place p:P625 ?coordStatement .\n\
         \x20 ?coordStatement psv:P625 ?coordNode .\n\
         \x20 ?coordNode wikibase:geoLatitude ?lat .\n\
         \x20 ?coordNode wikibase:geoLongitude ?lon .\n\
         \x20 OPTIONAL {{ ?place rdfs:label ?label . FILTER(LANG(?label) = \"en\") }}\n\
         \x20 OPTIONAL {{ ?place rdfs:label ?labelDe . FILTER(LANG(?labelDe) = \"de\") }}\n\
         }}"
    )
}
