//! Presentation helpers over a normalized authority record.
//!
//! Pure functions, no I/O; the presentation layer renders their output
//! directly.

use super::response::AuthorityRecord;

/// An outbound reference link for a record.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalLink {
    pub label: &'static str,
    pub url: String,
}

/// Format life dates, e.g. `"1749-1832"`, `"*1749"` for a living-or-unknown
/// death, `""` when neither date is known.
pub fn format_lifespan(record: &AuthorityRecord) -> String {
    let birth = record.birth_date.as_deref();
    let death = record.death_date.as_deref();

    if birth.is_none() && death.is_none() {
        return String::new();
    }

    let birth_year = birth.map(extract_year).unwrap_or_else(|| "?".to_string());

    match (birth, death) {
        (_, Some(death)) => format!("{birth_year}-{}", extract_year(death)),
        (Some(_), None) => format!("*{birth_year}"),
        (None, None) => String::new(),
    }
}

/// Format birth/death places, e.g. `"Frankfurt am Main - Weimar"`; a single
/// known place (or both equal) renders alone, neither renders empty.
pub fn format_places(record: &AuthorityRecord) -> String {
    let birth = record.birth_place.as_deref();
    let death = record.death_place.as_deref();

    match (birth, death) {
        (Some(b), Some(d)) if b != d => format!("{b} - {d}"),
        (Some(b), _) => b.to_string(),
        (None, Some(d)) => d.to_string(),
        (None, None) => String::new(),
    }
}

/// Outbound reference links in fixed order: authority record, linked-data
/// entity, encyclopedia article. Only present identifiers contribute.
pub fn external_links(record: &AuthorityRecord) -> Vec<ExternalLink> {
    let mut links = Vec::new();

    if !record.gnd_id.is_empty() {
        links.push(ExternalLink { label: "GND", url: format!("https://d-nb.info/gnd/{}", record.gnd_id) });
    }
    if let Some(qid) = &record.wikidata_id {
        links.push(ExternalLink { label: "Wikidata", url: format!("https://www.wikidata.org/wiki/{qid}") });
    }
    if let Some(url) = &record.wikipedia_url {
        links.push(ExternalLink { label: "Wikipedia", url: url.clone() });
    }

    links
}

/// Year of an ISO-like date: the leading 4-digit run, otherwise the string
/// verbatim (lobid dates are not always ISO, e.g. "ca. 1750").
fn extract_year(date: &str) -> String {
    let bytes = date.as_bytes();
    if bytes.len() >= 4 && bytes[..4].iter().all(u8::is_ascii_digit) {
        date[..4].to_string()
    } else {
        date.to_string()
    }
}
