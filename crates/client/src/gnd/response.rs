//! lobid.org GND response types and normalization.
//!
//! The raw lobid record is field-rich and repetitive; normalization keeps the
//! first entry of the multi-valued biographical fields, deduplicates
//! profession labels, and scans `sameAs`/`wikipedia` for the Wikidata entity
//! and a Wikipedia article (preferring the German edition).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static WIKIDATA_QID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Q\d+").expect("valid regex"));

/// Raw response from the lobid.org GND lookup service.
///
/// Every field is optional in practice; lobid omits what it doesn't know.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GndApiResponse {
    #[serde(default)]
    pub preferred_name: Option<String>,
    #[serde(default)]
    pub variant_name: Vec<String>,
    #[serde(default)]
    pub date_of_birth: Vec<String>,
    #[serde(default)]
    pub date_of_death: Vec<String>,
    #[serde(default)]
    pub place_of_birth: Vec<Labelled>,
    #[serde(default)]
    pub place_of_death: Vec<Labelled>,
    #[serde(default)]
    pub profession_or_occupation: Vec<Labelled>,
    #[serde(default)]
    pub gender: Vec<Labelled>,
    #[serde(default)]
    pub depiction: Vec<Depiction>,
    /// Entries are either objects with an `id` or bare identifier strings.
    #[serde(default)]
    pub same_as: Vec<serde_json::Value>,
    #[serde(default)]
    pub wikipedia: Vec<IdRef>,
    #[serde(default)]
    pub biographical_or_historical_information: Vec<String>,
    #[serde(default)]
    pub academic_degree: Vec<Labelled>,
    #[serde(default)]
    pub affiliation: Vec<Labelled>,
    #[serde(default)]
    pub place_of_activity: Vec<Labelled>,
}

/// A labelled reference as lobid renders linked entities.
#[derive(Debug, Default, Deserialize)]
pub struct Labelled {
    #[serde(default)]
    pub label: Option<String>,
}

/// A depiction entry: thumbnail plus full image id.
#[derive(Debug, Default, Deserialize)]
pub struct Depiction {
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

/// A reference carrying only an `id` URL.
#[derive(Debug, Default, Deserialize)]
pub struct IdRef {
    #[serde(default)]
    pub id: Option<String>,
}

/// Normalized biographical record for one GND identifier.
///
/// Serialized with camelCase keys; this is also the session-cache payload
/// layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorityRecord {
    pub gnd_id: String,
    pub preferred_name: Option<String>,
    #[serde(default)]
    pub variant_names: Vec<String>,
    pub birth_date: Option<String>,
    pub death_date: Option<String>,
    pub birth_place: Option<String>,
    pub death_place: Option<String>,
    #[serde(default)]
    pub professions: Vec<String>,
    pub gender: Option<String>,
    pub thumbnail_url: Option<String>,
    pub image_url: Option<String>,
    pub wikidata_id: Option<String>,
    pub wikipedia_url: Option<String>,
    pub biographical_note: Option<String>,
    pub academic_degree: Option<String>,
    #[serde(default)]
    pub affiliations: Vec<String>,
    #[serde(default)]
    pub places_of_activity: Vec<String>,
}

impl AuthorityRecord {
    /// Normalize a raw lobid response into a record for `gnd_id`.
    pub fn from_response(gnd_id: String, raw: GndApiResponse) -> Self {
        let wikidata_id = extract_wikidata_id(&raw.same_as);
        let wikipedia_url = extract_wikipedia_url(&raw.wikipedia, &raw.same_as);

        Self {
            gnd_id,
            preferred_name: raw.preferred_name,
            variant_names: raw.variant_name,
            birth_date: raw.date_of_birth.first().cloned(),
            death_date: raw.date_of_death.first().cloned(),
            birth_place: first_label(&raw.place_of_birth),
            death_place: first_label(&raw.place_of_death),
            professions: dedup_labels(&raw.profession_or_occupation),
            gender: first_label(&raw.gender),
            thumbnail_url: raw.depiction.first().and_then(|d| d.thumbnail.clone()),
            image_url: raw.depiction.first().and_then(|d| d.id.clone()),
            wikidata_id,
            wikipedia_url,
            biographical_note: raw.biographical_or_historical_information.first().cloned(),
            academic_degree: first_label(&raw.academic_degree),
            affiliations: all_labels(&raw.affiliation),
            places_of_activity: all_labels(&raw.place_of_activity),
        }
    }
}

/// Label of the first entry, if it carries one.
fn first_label(items: &[Labelled]) -> Option<String> {
    items.first().and_then(|item| item.label.clone())
}

/// All non-empty labels, input order.
fn all_labels(items: &[Labelled]) -> Vec<String> {
    items.iter().filter_map(|item| item.label.clone()).collect()
}

/// All non-empty labels with duplicates removed, first occurrence wins.
fn dedup_labels(items: &[Labelled]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for item in items {
        if let Some(label) = &item.label
            && !labels.iter().any(|seen| seen == label)
        {
            labels.push(label.clone());
        }
    }
    labels
}

/// A `sameAs` entry is either `{"id": "..."}` or a bare string.
fn same_as_id(value: &serde_json::Value) -> Option<&str> {
    value.get("id").and_then(serde_json::Value::as_str).or_else(|| value.as_str())
}

/// First Wikidata QID referenced from `sameAs`.
fn extract_wikidata_id(same_as: &[serde_json::Value]) -> Option<String> {
    same_as
        .iter()
        .filter_map(same_as_id)
        .find(|id| id.contains("wikidata.org"))
        .and_then(|id| WIKIDATA_QID.find(id))
        .map(|m| m.as_str().to_string())
}

/// Wikipedia article URL: the `wikipedia` field preferring the German
/// edition, else the first entry, else any `sameAs` Wikipedia reference.
fn extract_wikipedia_url(wikipedia: &[IdRef], same_as: &[serde_json::Value]) -> Option<String> {
    if let Some(de) = wikipedia
        .iter()
        .filter_map(|w| w.id.as_deref())
        .find(|id| id.contains("de.wikipedia"))
    {
        return Some(de.to_string());
    }
    if let Some(any) = wikipedia.iter().find_map(|w| w.id.clone()) {
        return Some(any);
    }

    same_as
        .iter()
        .filter_map(same_as_id)
        .find(|id| id.contains("wikipedia.org"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_JSON: &str = r#"{
        "preferredName": "Goethe, Johann Wolfgang von",
        "variantName": ["Goethe, Johann Wolfgang", "Gete, Iogann Volfgang"],
        "dateOfBirth": ["1749-08-28"],
        "dateOfDeath": ["1832-03-22"],
        "placeOfBirth": [{"label": "Frankfurt am Main"}],
        "placeOfDeath": [{"label": "Weimar"}],
        "professionOrOccupation": [
            {"label": "Schriftsteller"},
            {"label": "Dichter"},
            {"label": "Schriftsteller"}
        ],
        "gender": [{"label": "Männlich"}],
        "depiction": [{
            "thumbnail": "https://commons.wikimedia.org/thumb/goethe.jpg",
            "id": "https://commons.wikimedia.org/goethe.jpg"
        }],
        "sameAs": [
            {"id": "http://viaf.org/viaf/24602065"},
            {"id": "http://www.wikidata.org/entity/Q5879"},
            "https://en.wikipedia.org/wiki/Johann_Wolfgang_von_Goethe"
        ],
        "wikipedia": [
            {"id": "https://en.wikipedia.org/wiki/Johann_Wolfgang_von_Goethe"},
            {"id": "https://de.wikipedia.org/wiki/Johann_Wolfgang_von_Goethe"}
        ],
        "biographicalOrHistoricalInformation": ["Dichter, Naturforscher und Staatsmann"],
        "academicDegree": [{"label": "Lic. jur."}],
        "affiliation": [{"label": "Universität Leipzig"}],
        "placeOfActivity": [{"label": "Weimar"}]
    }"#;

    #[test]
    fn test_normalize_full_record() {
        let raw: GndApiResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        let record = AuthorityRecord::from_response("118540238".to_string(), raw);

        assert_eq!(record.gnd_id, "118540238");
        assert_eq!(record.preferred_name.as_deref(), Some("Goethe, Johann Wolfgang von"));
        assert_eq!(record.variant_names.len(), 2);
        assert_eq!(record.birth_date.as_deref(), Some("1749-08-28"));
        assert_eq!(record.death_date.as_deref(), Some("1832-03-22"));
        assert_eq!(record.birth_place.as_deref(), Some("Frankfurt am Main"));
        assert_eq!(record.death_place.as_deref(), Some("Weimar"));
        assert_eq!(record.gender.as_deref(), Some("Männlich"));
        assert_eq!(record.biographical_note.as_deref(), Some("Dichter, Naturforscher und Staatsmann"));
        assert_eq!(record.academic_degree.as_deref(), Some("Lic. jur."));
        assert_eq!(record.affiliations, vec!["Universität Leipzig"]);
        assert_eq!(record.places_of_activity, vec!["Weimar"]);
        assert_eq!(record.thumbnail_url.as_deref(), Some("https://commons.wikimedia.org/thumb/goethe.jpg"));
        assert_eq!(record.image_url.as_deref(), Some("https://commons.wikimedia.org/goethe.jpg"));
    }

    #[test]
    fn test_professions_deduplicated_in_order() {
        let raw: GndApiResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        let record = AuthorityRecord::from_response("118540238".to_string(), raw);
        assert_eq!(record.professions, vec!["Schriftsteller", "Dichter"]);
    }

    #[test]
    fn test_wikidata_id_from_same_as() {
        let raw: GndApiResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        let record = AuthorityRecord::from_response("118540238".to_string(), raw);
        assert_eq!(record.wikidata_id.as_deref(), Some("Q5879"));
    }

    #[test]
    fn test_wikipedia_prefers_german_edition() {
        let raw: GndApiResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        let record = AuthorityRecord::from_response("118540238".to_string(), raw);
        assert_eq!(
            record.wikipedia_url.as_deref(),
            Some("https://de.wikipedia.org/wiki/Johann_Wolfgang_von_Goethe")
        );
    }

    #[test]
    fn test_wikipedia_falls_back_to_same_as_string_entry() {
        let json = r#"{
            "preferredName": "Testperson",
            "sameAs": ["https://en.wikipedia.org/wiki/Testperson"]
        }"#;
        let raw: GndApiResponse = serde_json::from_str(json).unwrap();
        let record = AuthorityRecord::from_response("123".to_string(), raw);
        assert_eq!(record.wikipedia_url.as_deref(), Some("https://en.wikipedia.org/wiki/Testperson"));
        assert!(record.wikidata_id.is_none());
    }

    #[test]
    fn test_sparse_record() {
        let raw: GndApiResponse = serde_json::from_str(r#"{"preferredName": "Unbekannt"}"#).unwrap();
        let record = AuthorityRecord::from_response("999".to_string(), raw);

        assert_eq!(record.preferred_name.as_deref(), Some("Unbekannt"));
        assert!(record.birth_date.is_none());
        assert!(record.professions.is_empty());
        assert!(record.wikidata_id.is_none());
        assert!(record.wikipedia_url.is_none());
    }

    #[test]
    fn test_first_entry_without_label_yields_none() {
        let json = r#"{"placeOfBirth": [{}, {"label": "Weimar"}]}"#;
        let raw: GndApiResponse = serde_json::from_str(json).unwrap();
        let record = AuthorityRecord::from_response("1".to_string(), raw);
        assert!(record.birth_place.is_none());
    }

    #[test]
    fn test_cache_payload_layout_is_camel_case() {
        let record = AuthorityRecord { gnd_id: "118540238".to_string(), ..Default::default() };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("gndId").is_some());
        assert!(json.get("preferredName").is_some());
    }
}
