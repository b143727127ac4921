//! SPARQL result bindings and their coordinate normalization.

use serde::{Deserialize, Serialize};

/// Raw SPARQL JSON results envelope.
#[derive(Debug, Default, Deserialize)]
pub struct SparqlResponse {
    #[serde(default)]
    pub results: SparqlResults,
}

#[derive(Debug, Default, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub bindings: Vec<SparqlBinding>,
}

/// One result row. Every variable is optional; OPTIONAL clauses in the query
/// leave labels unbound for unlabeled entities.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SparqlBinding {
    #[serde(default)]
    pub geonames_id: Option<SparqlValue>,
    #[serde(default)]
    pub lat: Option<SparqlValue>,
    #[serde(default)]
    pub lon: Option<SparqlValue>,
    #[serde(default)]
    pub label: Option<SparqlValue>,
    #[serde(default)]
    pub label_de: Option<SparqlValue>,
}

/// A bound SPARQL value; only the lexical form matters here.
#[derive(Debug, Default, Deserialize)]
pub struct SparqlValue {
    pub value: String,
}

/// Resolved geocoordinates for one place identifier.
///
/// Both coordinates are always present; rows with a missing or unparsable
/// coordinate are dropped during normalization, never stored partially.
/// The serialized form (`{lat, lon, name}`) is the persistent-cache payload;
/// `place_id` is carried in the cache key instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCoordinate {
    #[serde(skip)]
    pub place_id: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "name")]
    pub label: Option<String>,
}

impl SparqlBinding {
    /// Normalize one row, preferring the German label over the English one.
    ///
    /// Returns `None` when the identifier or either coordinate is missing or
    /// unparsable.
    pub fn into_coordinate(self) -> Option<PlaceCoordinate> {
        let place_id = self.geonames_id?.value;
        let lat: f64 = self.lat?.value.parse().ok()?;
        let lon: f64 = self.lon?.value.parse().ok()?;
        let label = self.label_de.or(self.label).map(|v| v.value);

        Some(PlaceCoordinate { place_id, lat, lon, label })
    }
}
