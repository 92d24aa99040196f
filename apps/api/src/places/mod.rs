//! Place Provider: the seam between location ranking and the mapping service.
//!
//! Handlers and the resolver only ever see `PlaceProvider`. `GoogleMapsClient`
//! is the production backend; tests swap in an in-memory fake.

use async_trait::async_trait;
use thiserror::Error;

use crate::geo::LatLng;

pub mod google;
mod types;

pub use google::GoogleMapsClient;

/// Every upstream failure from the mapping service: transport errors,
/// non-2xx responses, malformed bodies and error statuses in the envelope.
/// A "zero results" answer is not a failure.
#[derive(Debug, Clone, Error)]
#[error("{}", display_unavailable(.status, .message))]
pub struct ProviderUnavailable {
    pub status: Option<u16>,
    pub message: String,
}

fn display_unavailable(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("HTTP {code}: {message}"),
        None => message.to_string(),
    }
}

impl ProviderUnavailable {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ProviderUnavailable {
    fn from(e: reqwest::Error) -> Self {
        Self::new(e.status().map(|s| s.as_u16()), e.to_string())
    }
}

/// A place returned by a search, before any filtering or ranking.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaceCandidate {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub rating: Option<f64>,
    pub rating_count: Option<u64>,
    pub address: Option<String>,
    pub vicinity: Option<String>,
    pub open_now: Option<bool>,
    pub types: Vec<String>,
}

impl PlaceCandidate {
    pub fn location(&self) -> LatLng {
        LatLng {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// Road distance and travel time for one destination.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceEstimate {
    pub distance_meters: f64,
    pub eta_text: Option<String>,
}

/// Mapping-service operations used by the location handlers.
#[async_trait]
pub trait PlaceProvider: Send + Sync {
    /// Text search, optionally biased toward `origin` within `radius_meters`.
    /// Results keep provider order; zero matches is an empty vec.
    async fn search_by_query(
        &self,
        query: &str,
        origin: Option<LatLng>,
        radius_meters: Option<u32>,
    ) -> Result<Vec<PlaceCandidate>, ProviderUnavailable>;

    /// Keyword search ranked nearest-first by the provider. At most `max_results`.
    async fn search_nearby(
        &self,
        origin: LatLng,
        keyword: &str,
        max_results: usize,
    ) -> Result<Vec<PlaceCandidate>, ProviderUnavailable>;

    /// Single best textual match, used when a text search finds nothing.
    async fn find_place(&self, query: &str) -> Result<Option<PlaceCandidate>, ProviderUnavailable>;

    /// Driving distance and ETA from `origin` to each destination.
    ///
    /// The returned vec is index-aligned with `destinations`; `None` marks a
    /// destination the provider could not measure. One bad destination never
    /// fails the batch.
    async fn distance_and_eta(
        &self,
        origin: LatLng,
        destinations: &[LatLng],
    ) -> Result<Vec<Option<DistanceEstimate>>, ProviderUnavailable>;
}
