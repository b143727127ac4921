//! Boundary types for the pre-built correspondence corpus.
//!
//! The corpus is owned by the upstream static dataset; the enrichment layer
//! only ever annotates places with coordinates. These structs model the
//! fields enrichment reads or writes, everything else in the JSON is ignored
//! on deserialize and left untouched on the caller's side.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The in-memory corpus: letters plus the person and place indices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    pub letters: Vec<Letter>,
    #[serde(default)]
    pub indices: Indices,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Indices {
    /// Persons keyed by corpus person id.
    #[serde(default)]
    pub persons: BTreeMap<String, Person>,
    /// Places keyed by GeoNames id.
    #[serde(default)]
    pub places: BTreeMap<String, Place>,
}

/// One letter record; only the origin place matters for enrichment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Letter {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub place_sent: Option<Place>,
}

/// A place, possibly already carrying coordinates from the upstream build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub geonames_id: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl Place {
    /// True once both coordinates are known.
    pub fn has_coordinates(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }
}

/// A correspondent from the person index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub name: Option<String>,
    /// Authority scheme, e.g. "gnd".
    #[serde(default)]
    pub authority: Option<String>,
    #[serde(default)]
    pub authority_id: Option<String>,
}

impl Person {
    /// True iff this person carries a GND authority id.
    pub fn has_gnd_id(&self) -> bool {
        self.authority.as_deref() == Some("gnd") && self.authority_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Dereferenceable GND URI for this person, if any.
    pub fn gnd_uri(&self) -> Option<String> {
        if !self.has_gnd_id() {
            return None;
        }
        self.authority_id.as_ref().map(|id| format!("http://d-nb.info/gnd/{id}"))
    }
}
