//! Namespaced TTL cache over pluggable storage backends.
//!
//! A `CacheStore` binds one namespace to a backend, a TTL, and a clock.
//! Reads treat expired entries as absent and evict them lazily; writes
//! overwrite unconditionally. Storage failures never surface to callers:
//! a failed read is a miss, a failed write just loses the memoization.

use super::clock::{Clock, SystemClock};
use crate::Error;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Default entry lifetime: 7 days.
pub const DEFAULT_TTL_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Raw cache row as stored by a backend.
#[derive(Debug, Clone)]
pub struct RawEntry {
    /// JSON payload: either the cached record or the `{"notFound": true}` marker.
    pub payload: String,
    /// Write time in milliseconds since the Unix epoch.
    pub cached_at: i64,
}

/// Storage backend for one or more cache namespaces.
#[async_trait::async_trait]
pub trait Backend: Send + Sync + std::fmt::Debug {
    async fn read(&self, namespace: &str, key: &str) -> Result<Option<RawEntry>, Error>;
    async fn write(&self, namespace: &str, key: &str, entry: RawEntry) -> Result<(), Error>;
    async fn remove(&self, namespace: &str, key: &str) -> Result<(), Error>;
    async fn clear(&self, namespace: &str) -> Result<(), Error>;
}

/// A cache hit: either the cached record or the negative marker meaning
/// "resolution was attempted and definitively found nothing."
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

/// Session-tier backend: lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<(String, String), RawEntry>>,
}

#[async_trait::async_trait]
impl Backend for MemoryBackend {
    async fn read(&self, namespace: &str, key: &str) -> Result<Option<RawEntry>, Error> {
        let entries = self.entries.lock().expect("cache mutex poisoned");
        Ok(entries.get(&(namespace.to_string(), key.to_string())).cloned())
    }

    async fn write(&self, namespace: &str, key: &str, entry: RawEntry) -> Result<(), Error> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert((namespace.to_string(), key.to_string()), entry);
        Ok(())
    }

    async fn remove(&self, namespace: &str, key: &str) -> Result<(), Error> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.remove(&(namespace.to_string(), key.to_string()));
        Ok(())
    }

    async fn clear(&self, namespace: &str) -> Result<(), Error> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.retain(|(ns, _), _| ns != namespace);
        Ok(())
    }
}

/// One cache namespace with TTL semantics.
///
/// An entry is valid iff `now - cached_at < ttl`. Negative results are
/// persisted as `{"notFound": true}` and surface as [`Lookup::NotFound`].
#[derive(Debug, Clone)]
pub struct CacheStore {
    backend: Arc<dyn Backend>,
    namespace: String,
    ttl_ms: i64,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    /// Session-tier store over a fresh in-memory backend.
    pub fn session(namespace: &str, ttl_ms: i64) -> Self {
        Self::with_clock(Arc::new(MemoryBackend::default()), namespace, ttl_ms, Arc::new(SystemClock))
    }

    /// Store over an explicit backend and clock.
    pub fn with_clock(backend: Arc<dyn Backend>, namespace: &str, ttl_ms: i64, clock: Arc<dyn Clock>) -> Self {
        Self { backend, namespace: namespace.to_string(), ttl_ms, clock }
    }

    /// Return the cached payload for `key` if present and unexpired.
    ///
    /// Expired entries are evicted as a side effect. Backend failures and
    /// undeserializable payloads are treated as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<Lookup<T>> {
        let entry = match self.backend.read(&self.namespace, key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(namespace = %self.namespace, key, error = %e, "cache read failed");
                return None;
            }
        };

        if self.clock.now_ms() - entry.cached_at >= self.ttl_ms {
            if let Err(e) = self.backend.remove(&self.namespace, key).await {
                tracing::warn!(namespace = %self.namespace, key, error = %e, "failed to evict expired entry");
            }
            return None;
        }

        let value: serde_json::Value = match serde_json::from_str(&entry.payload) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(namespace = %self.namespace, key, error = %e, "corrupt cache payload");
                return None;
            }
        };

        if value.get("notFound").and_then(serde_json::Value::as_bool).unwrap_or(false) {
            return Some(Lookup::NotFound);
        }

        match serde_json::from_value(value) {
            Ok(record) => Some(Lookup::Found(record)),
            Err(e) => {
                tracing::warn!(namespace = %self.namespace, key, error = %e, "cache payload shape mismatch");
                None
            }
        }
    }

    /// Store a record under `key`, stamped with the current time.
    ///
    /// Overwrites any prior entry. Write failures are swallowed: the current
    /// resolution still succeeds, it is just not memoized.
    pub async fn put<T: Serialize>(&self, key: &str, value: &T) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(namespace = %self.namespace, key, error = %e, "failed to serialize cache payload");
                return;
            }
        };
        self.write_raw(key, payload).await;
    }

    /// Store the negative marker under `key`.
    pub async fn put_negative(&self, key: &str) {
        self.write_raw(key, r#"{"notFound":true}"#.to_string()).await;
    }

    /// Remove every entry in this namespace.
    pub async fn clear(&self) {
        if let Err(e) = self.backend.clear(&self.namespace).await {
            tracing::warn!(namespace = %self.namespace, error = %e, "cache clear failed");
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn write_raw(&self, key: &str, payload: String) {
        let entry = RawEntry { payload, cached_at: self.clock.now_ms() };
        if let Err(e) = self.backend.write(&self.namespace, key, entry).await {
            tracing::warn!(namespace = %self.namespace, key, error = %e, "cache write failed, result not memoized");
        }
    }
}
