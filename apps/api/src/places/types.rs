// Wire types for the Google Maps web-service JSON envelopes.

use serde::Deserialize;

use super::{DistanceEstimate, PlaceCandidate};

#[derive(Debug, Deserialize)]
pub struct PlacesSearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<RawPlace>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FindPlaceResponse {
    pub status: String,
    #[serde(default)]
    pub candidates: Vec<RawPlace>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawPlace {
    pub name: Option<String>,
    pub geometry: Option<Geometry>,
    pub formatted_address: Option<String>,
    pub vicinity: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    pub opening_hours: Option<OpeningHours>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: Option<RawLatLng>,
}

#[derive(Debug, Deserialize)]
pub struct RawLatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct OpeningHours {
    pub open_now: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct DistanceMatrixResponse {
    pub status: String,
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatrixRow {
    #[serde(default)]
    pub elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
pub struct MatrixElement {
    pub status: String,
    pub distance: Option<TextValue>,
    pub duration: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: f64,
}

impl RawPlace {
    /// Drops results that cannot be placed on a map or named.
    pub fn into_candidate(self) -> Option<PlaceCandidate> {
        let location = self.geometry?.location?;
        if !location.lat.is_finite() || !location.lng.is_finite() {
            return None;
        }
        let name = self.name.filter(|n| !n.trim().is_empty())?;

        Some(PlaceCandidate {
            name,
            lat: location.lat,
            lng: location.lng,
            rating: self.rating,
            rating_count: self.user_ratings_total,
            address: self.formatted_address.filter(|a| !a.trim().is_empty()),
            vicinity: self.vicinity.filter(|v| !v.trim().is_empty()),
            open_now: self.opening_hours.and_then(|h| h.open_now),
            types: self.types,
        })
    }
}

impl MatrixElement {
    pub fn into_estimate(self) -> Option<DistanceEstimate> {
        if self.status != "OK" {
            return None;
        }
        let distance = self.distance?;
        Some(DistanceEstimate {
            distance_meters: distance.value,
            eta_text: self.duration.map(|d| d.text),
        })
    }
}
