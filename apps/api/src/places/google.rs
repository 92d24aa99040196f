//! Google Maps web-service backend for `PlaceProvider`.
//!
//! Covers Places Text Search, Nearby Search, Find Place and the Distance
//! Matrix. Every call hits the network; nothing is cached between requests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{DistanceMatrixResponse, FindPlaceResponse, PlacesSearchResponse, RawPlace};
use super::{DistanceEstimate, PlaceCandidate, PlaceProvider, ProviderUnavailable};
use crate::geo::LatLng;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";
const TEXT_SEARCH_PATH: &str = "maps/api/place/textsearch/json";
const NEARBY_SEARCH_PATH: &str = "maps/api/place/nearbysearch/json";
const FIND_PLACE_PATH: &str = "maps/api/place/findplacefromtext/json";
const DISTANCE_MATRIX_PATH: &str = "maps/api/distancematrix/json";
const FIND_PLACE_FIELDS: &str =
    "name,geometry,formatted_address,types,rating,user_ratings_total,opening_hours";
/// Distance Matrix accepts at most 25 destinations per request.
const MAX_MATRIX_DESTINATIONS: usize = 25;

#[derive(Clone)]
pub struct GoogleMapsClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl GoogleMapsClient {
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, ProviderUnavailable> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Points the client at another host, e.g. a wiremock server in tests.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ProviderUnavailable> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| {
            ProviderUnavailable::new(None, format!("invalid base URL '{base_url}': {e}"))
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url, ProviderUnavailable> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ProviderUnavailable::new(None, format!("invalid endpoint {path}: {e}")))?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
            .append_pair("key", &self.api_key);
        Ok(url)
    }

    /// GETs `url` and deserializes the body, mapping every failure to
    /// `ProviderUnavailable` with the upstream status where there is one.
    async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ProviderUnavailable> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            };
            return Err(ProviderUnavailable::new(Some(status.as_u16()), message));
        }

        serde_json::from_str(&body).map_err(|e| {
            ProviderUnavailable::new(
                Some(status.as_u16()),
                format!("malformed provider response: {e}"),
            )
        })
    }

    async fn text_search(
        &self,
        params: Vec<(&str, String)>,
    ) -> Result<Vec<PlaceCandidate>, ProviderUnavailable> {
        let url = self.endpoint(TEXT_SEARCH_PATH, &params)?;
        let response: PlacesSearchResponse = self.fetch_json(url).await?;
        if !check_status(&response.status, response.error_message.as_deref())? {
            return Ok(Vec::new());
        }
        Ok(normalize(response.results))
    }

    async fn matrix_batch(
        &self,
        origin: LatLng,
        destinations: &[LatLng],
    ) -> Result<Vec<Option<DistanceEstimate>>, ProviderUnavailable> {
        let joined = destinations
            .iter()
            .map(|d| d.to_query_value())
            .collect::<Vec<_>>()
            .join("|");
        let url = self.endpoint(
            DISTANCE_MATRIX_PATH,
            &[
                ("origins", origin.to_query_value()),
                ("destinations", joined),
                ("mode", "driving".to_string()),
            ],
        )?;

        let response: DistanceMatrixResponse = self.fetch_json(url).await?;
        if response.status != "OK" {
            return Err(status_error(&response.status, response.error_message.as_deref()));
        }

        let mut elements = response
            .rows
            .into_iter()
            .next()
            .map(|row| row.elements)
            .unwrap_or_default()
            .into_iter();

        // Elements missing from a short row become per-destination failures.
        Ok(destinations
            .iter()
            .map(|_| elements.next().and_then(|el| el.into_estimate()))
            .collect())
    }
}

#[async_trait]
impl PlaceProvider for GoogleMapsClient {
    async fn search_by_query(
        &self,
        query: &str,
        origin: Option<LatLng>,
        radius_meters: Option<u32>,
    ) -> Result<Vec<PlaceCandidate>, ProviderUnavailable> {
        let mut params = vec![("query", query.to_string())];
        if let Some(origin) = origin {
            params.push(("location", origin.to_query_value()));
            if let Some(radius) = radius_meters {
                params.push(("radius", radius.to_string()));
            }
        }
        debug!(query, ?origin, ?radius_meters, "places text search");
        self.text_search(params).await
    }

    async fn search_nearby(
        &self,
        origin: LatLng,
        keyword: &str,
        max_results: usize,
    ) -> Result<Vec<PlaceCandidate>, ProviderUnavailable> {
        let url = self.endpoint(
            NEARBY_SEARCH_PATH,
            &[
                ("location", origin.to_query_value()),
                ("keyword", keyword.to_string()),
                ("rankby", "distance".to_string()),
            ],
        )?;
        debug!(keyword, ?origin, "places nearby search");

        let response: PlacesSearchResponse = self.fetch_json(url).await?;
        if !check_status(&response.status, response.error_message.as_deref())? {
            return Ok(Vec::new());
        }
        let mut places = normalize(response.results);
        places.truncate(max_results);
        Ok(places)
    }

    async fn find_place(&self, query: &str) -> Result<Option<PlaceCandidate>, ProviderUnavailable> {
        let url = self.endpoint(
            FIND_PLACE_PATH,
            &[
                ("input", query.to_string()),
                ("inputtype", "textquery".to_string()),
                ("fields", FIND_PLACE_FIELDS.to_string()),
            ],
        )?;
        debug!(query, "find place from text");

        let response: FindPlaceResponse = self.fetch_json(url).await?;
        if !check_status(&response.status, response.error_message.as_deref())? {
            return Ok(None);
        }
        Ok(normalize(response.candidates).into_iter().next())
    }

    async fn distance_and_eta(
        &self,
        origin: LatLng,
        destinations: &[LatLng],
    ) -> Result<Vec<Option<DistanceEstimate>>, ProviderUnavailable> {
        let mut estimates = Vec::with_capacity(destinations.len());
        for batch in destinations.chunks(MAX_MATRIX_DESTINATIONS) {
            estimates.extend(self.matrix_batch(origin, batch).await?);
        }
        Ok(estimates)
    }
}

/// `Ok(true)` for results, `Ok(false)` for an explicit zero-result answer,
/// and an error for any other provider status.
fn check_status(status: &str, error_message: Option<&str>) -> Result<bool, ProviderUnavailable> {
    match status {
        "OK" => Ok(true),
        "ZERO_RESULTS" => Ok(false),
        other => Err(status_error(other, error_message)),
    }
}

fn status_error(status: &str, error_message: Option<&str>) -> ProviderUnavailable {
    let message = match error_message {
        Some(detail) => format!("{status}: {detail}"),
        None => status.to_string(),
    };
    ProviderUnavailable::new(None, message)
}

fn normalize(raw: Vec<RawPlace>) -> Vec<PlaceCandidate> {
    raw.into_iter().filter_map(RawPlace::into_candidate).collect()
}
