//! Core types and shared functionality for epistola.
//!
//! This crate provides:
//! - TTL cache with session (in-memory) and persistent (SQLite) tiers
//! - Boundary types for the read-only correspondence corpus
//! - Configuration structures
//! - Unified error types

pub mod cache;
pub mod config;
pub mod corpus;
pub mod error;

pub use cache::{CacheDb, CacheStore, Lookup};
pub use config::AppConfig;
pub use corpus::Corpus;
pub use error::Error;
