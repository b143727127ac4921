//! TTL-bounded memoization of remote lookups.
//!
//! Two lifetime tiers share one contract:
//!
//! - a **session** tier (in-memory, process lifetime) holding authority
//!   records keyed by GND id, including negative markers
//! - a **persistent** tier (SQLite via tokio-rusqlite, WAL mode, versioned
//!   migrations) holding place coordinates across sessions
//!
//! Both are fronted by [`CacheStore`], which owns the TTL check, lazy
//! eviction, and the never-throws error policy.

pub mod clock;
pub mod connection;
pub mod entries;
pub mod migrations;
pub mod store;

pub use crate::Error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use connection::CacheDb;
pub use store::{Backend, CacheStore, DEFAULT_TTL_MS, Lookup, MemoryBackend, RawEntry};
