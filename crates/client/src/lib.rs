//! Enrichment clients for epistola.
//!
//! This crate provides the external authority enrichment pipeline: the GND
//! biographical resolver, the Wikidata coordinate resolver, and the merger
//! that folds resolved coordinates back into the corpus.

pub mod enrich;
pub mod gnd;
pub mod wikidata;

pub use enrich::{CoordinateNeeds, analyze_needs, apply_coordinates};
pub use gnd::{AuthorityRecord, GndClient, GndConfig, extract_gnd_id};
pub use wikidata::{PlaceCoordinate, SparqlConfig, WikidataClient};
