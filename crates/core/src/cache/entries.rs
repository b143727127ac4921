//! Persistent cache entry operations.
//!
//! Implements the [`Backend`] contract on top of the SQLite `cache_entries`
//! table, giving the persistent tier the same get/put/clear surface as the
//! session tier.

use super::connection::CacheDb;
use super::store::{Backend, CacheStore, RawEntry};
use crate::Error;
use crate::cache::clock::SystemClock;
use std::sync::Arc;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

impl CacheDb {
    /// Read one entry, or None if the (namespace, key) pair is absent.
    pub async fn read_entry(&self, namespace: &str, key: &str) -> Result<Option<RawEntry>, Error> {
        let namespace = namespace.to_string();
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<RawEntry>, Error> {
                let result = conn.query_row(
                    "SELECT payload, cached_at FROM cache_entries WHERE namespace = ?1 AND key = ?2",
                    params![namespace, key],
                    |row| Ok(RawEntry { payload: row.get(0)?, cached_at: row.get(1)? }),
                );

                match result {
                    Ok(entry) => Ok(Some(entry)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or overwrite one entry.
    pub async fn write_entry(&self, namespace: &str, key: &str, entry: RawEntry) -> Result<(), Error> {
        let namespace = namespace.to_string();
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO cache_entries (namespace, key, payload, cached_at)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(namespace, key) DO UPDATE SET
                        payload = excluded.payload,
                        cached_at = excluded.cached_at",
                    params![namespace, key, entry.payload, entry.cached_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete one entry. Deleting an absent entry is not an error.
    pub async fn remove_entry(&self, namespace: &str, key: &str) -> Result<(), Error> {
        let namespace = namespace.to_string();
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "DELETE FROM cache_entries WHERE namespace = ?1 AND key = ?2",
                    params![namespace, key],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every entry under a namespace.
    ///
    /// Returns the number of deleted entries.
    pub async fn clear_namespace(&self, namespace: &str) -> Result<u64, Error> {
        let namespace = namespace.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM cache_entries WHERE namespace = ?1", params![namespace])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait::async_trait]
impl Backend for CacheDb {
    async fn read(&self, namespace: &str, key: &str) -> Result<Option<RawEntry>, Error> {
        self.read_entry(namespace, key).await
    }

    async fn write(&self, namespace: &str, key: &str, entry: RawEntry) -> Result<(), Error> {
        self.write_entry(namespace, key, entry).await
    }

    async fn remove(&self, namespace: &str, key: &str) -> Result<(), Error> {
        self.remove_entry(namespace, key).await
    }

    async fn clear(&self, namespace: &str) -> Result<(), Error> {
        self.clear_namespace(namespace).await?;
        Ok(())
    }
}

impl CacheStore {
    /// Persistent-tier store over an opened cache database.
    pub fn persistent(db: CacheDb, namespace: &str, ttl_ms: i64) -> Self {
        Self::with_clock(Arc::new(db), namespace, ttl_ms, Arc::new(SystemClock))
    }
}
