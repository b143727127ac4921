//! Folding resolved coordinates back into the corpus.
//!
//! The corpus is owned by the presentation layer; the merger only ever fills
//! missing coordinates, never touching identifiers or data the upstream
//! build already supplied. The needs analysis is the read-only counterpart
//! that produces the resolver's input.

use crate::wikidata::PlaceCoordinate;
use epistola_core::corpus::Corpus;
use std::collections::HashMap;

/// What the place index needs from coordinate resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateNeeds {
    pub total_places: usize,
    pub with_coordinates: usize,
    pub needs_resolution: usize,
    /// Identifiers to submit to `resolve_batch`, index order.
    pub ids_to_resolve: Vec<String>,
}

/// Copy resolved coordinates onto letters' origin places and the place index.
///
/// A place that already carries a latitude is left untouched, so applying
/// the same map twice changes nothing. Returns the number of places updated,
/// for diagnostic reporting only.
pub fn apply_coordinates(corpus: &mut Corpus, coordinates: &HashMap<String, PlaceCoordinate>) -> usize {
    let mut updated = 0;

    for letter in &mut corpus.letters {
        if let Some(place) = letter.place_sent.as_mut()
            && place.lat.is_none()
            && let Some(id) = place.geonames_id.as_deref()
            && let Some(coord) = coordinates.get(id)
        {
            place.lat = Some(coord.lat);
            place.lon = Some(coord.lon);
            updated += 1;
        }
    }

    for (id, place) in &mut corpus.indices.places {
        if place.lat.is_none()
            && let Some(coord) = coordinates.get(id)
        {
            place.lat = Some(coord.lat);
            place.lon = Some(coord.lon);
            updated += 1;
        }
    }

    tracing::debug!(updated, "applied coordinates to corpus");
    updated
}

/// Scan the place index and report what still needs resolving. No side
/// effects; `ids_to_resolve` is the input to `WikidataClient::resolve_batch`.
pub fn analyze_needs(corpus: &Corpus) -> CoordinateNeeds {
    let mut needs = CoordinateNeeds::default();

    for (id, place) in &corpus.indices.places {
        needs.total_places += 1;

        if place.has_coordinates() {
            needs.with_coordinates += 1;
        } else if !id.is_empty() {
            needs.needs_resolution += 1;
            needs.ids_to_resolve.push(id.clone());
        }
    }

    needs
}

#[cfg(test)]
mod tests {
    use super::*;
    use epistola_core::corpus::{Indices, Letter, Place};

    fn coord(id: &str, lat: f64, lon: f64) -> (String, PlaceCoordinate) {
        (id.to_string(), PlaceCoordinate { place_id: id.to_string(), lat, lon, label: None })
    }

    fn sample_corpus() -> Corpus {
        let mut corpus = Corpus {
            letters: vec![Letter {
                id: "L001".to_string(),
                date: Some("1797-06-18".to_string()),
                place_sent: Some(Place {
                    name: Some("Jena".to_string()),
                    geonames_id: Some("2895044".to_string()),
                    ..Default::default()
                }),
            }],
            indices: Indices::default(),
        };
        corpus.indices.places.insert(
            "2895044".to_string(),
            Place { name: Some("Jena".to_string()), geonames_id: Some("2895044".to_string()), ..Default::default() },
        );
        corpus.indices.places.insert(
            "2761369".to_string(),
            Place {
                name: Some("Wien".to_string()),
                geonames_id: Some("2761369".to_string()),
                lat: Some(48.2082),
                lon: Some(16.3738),
            },
        );
        corpus
    }

    #[test]
    fn test_apply_fills_letter_and_index() {
        let mut corpus = sample_corpus();
        let coordinates: HashMap<_, _> = [coord("2895044", 50.9271, 11.5892)].into_iter().collect();

        let updated = apply_coordinates(&mut corpus, &coordinates);

        // Letter origin plus the index entry.
        assert_eq!(updated, 2);
        let letter_place = corpus.letters[0].place_sent.as_ref().unwrap();
        assert_eq!(letter_place.lat, Some(50.9271));
        assert_eq!(letter_place.lon, Some(11.5892));
        assert!(corpus.indices.places["2895044"].has_coordinates());
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut corpus = sample_corpus();
        let coordinates: HashMap<_, _> = [coord("2895044", 50.9271, 11.5892)].into_iter().collect();

        apply_coordinates(&mut corpus, &coordinates);
        let snapshot = serde_json::to_string(&corpus).unwrap();

        let updated_again = apply_coordinates(&mut corpus, &coordinates);

        assert_eq!(updated_again, 0);
        assert_eq!(serde_json::to_string(&corpus).unwrap(), snapshot);
    }

    #[test]
    fn test_apply_never_overwrites_existing_coordinates() {
        let mut corpus = sample_corpus();
        let coordinates: HashMap<_, _> = [coord("2761369", 0.0, 0.0)].into_iter().collect();

        let updated = apply_coordinates(&mut corpus, &coordinates);

        assert_eq!(updated, 0);
        assert_eq!(corpus.indices.places["2761369"].lat, Some(48.2082));
        assert_eq!(corpus.indices.places["2761369"].lon, Some(16.3738));
    }

    #[test]
    fn test_apply_ignores_unresolved_places() {
        let mut corpus = sample_corpus();
        let coordinates = HashMap::new();

        let updated = apply_coordinates(&mut corpus, &coordinates);

        assert_eq!(updated, 0);
        assert!(!corpus.indices.places["2895044"].has_coordinates());
    }

    #[test]
    fn test_apply_leaves_other_fields_alone() {
        let mut corpus = sample_corpus();
        let coordinates: HashMap<_, _> = [coord("2895044", 50.9271, 11.5892)].into_iter().collect();

        apply_coordinates(&mut corpus, &coordinates);

        let place = &corpus.indices.places["2895044"];
        assert_eq!(place.name.as_deref(), Some("Jena"));
        assert_eq!(place.geonames_id.as_deref(), Some("2895044"));
        assert_eq!(corpus.letters[0].date.as_deref(), Some("1797-06-18"));
    }

    #[test]
    fn test_analyze_reports_candidates_in_index_order() {
        let corpus = sample_corpus();
        let needs = analyze_needs(&corpus);

        assert_eq!(needs.total_places, 2);
        assert_eq!(needs.with_coordinates, 1);
        assert_eq!(needs.needs_resolution, 1);
        assert_eq!(needs.ids_to_resolve, vec!["2895044"]);
    }

    #[test]
    fn test_analyze_has_no_side_effects() {
        let corpus = sample_corpus();
        let before = serde_json::to_string(&corpus).unwrap();
        let _ = analyze_needs(&corpus);
        assert_eq!(serde_json::to_string(&corpus).unwrap(), before);
    }

    #[test]
    fn test_analyze_empty_corpus() {
        let needs = analyze_needs(&Corpus::default());
        assert_eq!(needs, CoordinateNeeds::default());
    }
}
