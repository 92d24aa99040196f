//! Response Assembler: turns ranked places into the caller-facing record.

use serde::{Deserialize, Serialize};

use crate::geo::round_coordinate;
use crate::places::PlaceCandidate;

pub const ETA_UNAVAILABLE: &str = "ETA unavailable";
/// Description used by the single-best-match endpoint when a place has no metadata.
pub const TOP_MATCH_DESCRIPTION: &str = "Top match based on rating and proximity";

const DESCRIPTION_SEPARATOR: &str = " • ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResult {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub city: Option<String>,
    pub address: String,
    pub description: String,
    pub eta: String,
}

impl LocationResult {
    pub fn from_place(place: &PlaceCandidate, eta: Option<&str>, fallback_description: &str) -> Self {
        let address = place
            .address
            .as_deref()
            .or(place.vicinity.as_deref())
            .unwrap_or_default()
            .to_string();

        LocationResult {
            name: place.name.clone(),
            lat: round_coordinate(place.lat),
            lng: round_coordinate(place.lng),
            city: city_from_address(&address),
            description: describe_place(place, fallback_description),
            address,
            eta: eta
                .filter(|e| !e.trim().is_empty())
                .unwrap_or(ETA_UNAVAILABLE)
                .to_string(),
        }
    }
}

/// Fallback description for list results: `Match for "<query>"`.
pub fn query_match_description(query: &str) -> String {
    format!("Match for \"{query}\"")
}

/// Second-to-last comma-separated segment of a formatted address, which is
/// the locality for most Google addresses. A single segment is returned
/// whole; an empty address has no city.
pub fn city_from_address(address: &str) -> Option<String> {
    let parts: Vec<&str> = address
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    match parts.as_slice() {
        [] => None,
        [only] => Some((*only).to_string()),
        [.., city, _] => Some((*city).to_string()),
    }
}

/// `"<first type> • <vicinity or address>"`, with either half omitted when
/// missing, or `fallback` when both are.
pub fn describe_place(place: &PlaceCandidate, fallback: &str) -> String {
    let kind = place
        .types
        .first()
        .map(|t| t.replace('_', " "))
        .filter(|t| !t.trim().is_empty());
    let near = place.vicinity.clone().or_else(|| place.address.clone());

    let pieces: Vec<String> = kind.into_iter().chain(near).collect();
    if pieces.is_empty() {
        fallback.to_string()
    } else {
        pieces.join(DESCRIPTION_SEPARATOR)
    }
}
