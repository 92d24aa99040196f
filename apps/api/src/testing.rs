//! In-memory `PlaceProvider` and `LanguageModel` doubles for unit and router tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::geo::{haversine_distance_meters, LatLng};
use crate::llm_client::{LanguageModel, LlmError};
use crate::places::{DistanceEstimate, PlaceCandidate, PlaceProvider, ProviderUnavailable};

/// A recorded provider call.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceCall {
    Text {
        query: String,
        radius_meters: Option<u32>,
        biased: bool,
    },
    Nearby {
        keyword: String,
    },
    Find {
        query: String,
    },
    Matrix {
        destinations: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixBehavior {
    /// Road distance = 1.2 × straight line, ETA "<n> mins".
    #[default]
    Measured,
    /// Every destination comes back unmeasured.
    Unmeasured,
    /// The whole call fails.
    Fails,
}

/// Acts like a biased text search: a radius-limited query only returns the
/// configured places that lie within that radius of the origin.
#[derive(Default)]
pub struct FakePlaces {
    places: Vec<PlaceCandidate>,
    nearby: Vec<PlaceCandidate>,
    find: Option<PlaceCandidate>,
    failing_radii: Vec<u32>,
    text_search_fails: bool,
    matrix: MatrixBehavior,
    calls: Mutex<Vec<PlaceCall>>,
}

impl FakePlaces {
    pub fn with_places(places: Vec<PlaceCandidate>) -> Self {
        Self {
            places,
            ..Default::default()
        }
    }

    /// Nearby-search results, returned regardless of origin.
    pub fn with_nearby(mut self, nearby: Vec<PlaceCandidate>) -> Self {
        self.nearby = nearby;
        self
    }

    pub fn with_find(mut self, place: PlaceCandidate) -> Self {
        self.find = Some(place);
        self
    }

    /// Text searches at these radii fail in transport.
    pub fn failing_at(mut self, radii: &[u32]) -> Self {
        self.failing_radii = radii.to_vec();
        self
    }

    /// Every text search fails with a 503.
    pub fn failing_text_search(mut self) -> Self {
        self.text_search_fails = true;
        self
    }

    pub fn with_matrix(mut self, matrix: MatrixBehavior) -> Self {
        self.matrix = matrix;
        self
    }

    pub fn calls(&self) -> Vec<PlaceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn text_radii(&self) -> Vec<Option<u32>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PlaceCall::Text { radius_meters, .. } => Some(radius_meters),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: PlaceCall) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn place_at(name: &str, lat: f64, lng: f64) -> PlaceCandidate {
    PlaceCandidate {
        name: name.to_string(),
        lat,
        lng,
        address: Some(format!("{name} Street, Indiranagar, Bengaluru, India")),
        types: vec!["cafe".to_string()],
        ..Default::default()
    }
}

/// Moves `meters` due north of `origin`.
pub fn north_of(origin: LatLng, meters: f64) -> (f64, f64) {
    (origin.lat + meters / 111_195.0, origin.lng)
}

#[async_trait]
impl PlaceProvider for FakePlaces {
    async fn search_by_query(
        &self,
        query: &str,
        origin: Option<LatLng>,
        radius_meters: Option<u32>,
    ) -> Result<Vec<PlaceCandidate>, ProviderUnavailable> {
        self.record(PlaceCall::Text {
            query: query.to_string(),
            radius_meters,
            biased: origin.is_some(),
        });

        if self.text_search_fails {
            return Err(ProviderUnavailable::new(Some(503), "text search down"));
        }
        if let Some(radius) = radius_meters.filter(|r| self.failing_radii.contains(r)) {
            return Err(ProviderUnavailable::new(None, format!("timeout at {radius}")));
        }

        Ok(match (origin, radius_meters) {
            (Some(origin), Some(radius)) => self
                .places
                .iter()
                .filter(|p| haversine_distance_meters(origin, p.location()) <= f64::from(radius))
                .cloned()
                .collect(),
            _ => self.places.clone(),
        })
    }

    async fn search_nearby(
        &self,
        _origin: LatLng,
        keyword: &str,
        max_results: usize,
    ) -> Result<Vec<PlaceCandidate>, ProviderUnavailable> {
        self.record(PlaceCall::Nearby {
            keyword: keyword.to_string(),
        });
        Ok(self.nearby.iter().take(max_results).cloned().collect())
    }

    async fn find_place(&self, query: &str) -> Result<Option<PlaceCandidate>, ProviderUnavailable> {
        self.record(PlaceCall::Find {
            query: query.to_string(),
        });
        Ok(self.find.clone())
    }

    async fn distance_and_eta(
        &self,
        origin: LatLng,
        destinations: &[LatLng],
    ) -> Result<Vec<Option<DistanceEstimate>>, ProviderUnavailable> {
        self.record(PlaceCall::Matrix {
            destinations: destinations.len(),
        });

        match self.matrix {
            MatrixBehavior::Fails => Err(ProviderUnavailable::new(Some(500), "matrix down")),
            MatrixBehavior::Unmeasured => Ok(vec![None; destinations.len()]),
            MatrixBehavior::Measured => Ok(destinations
                .iter()
                .map(|d| {
                    let road = haversine_distance_meters(origin, *d) * 1.2;
                    Some(DistanceEstimate {
                        distance_meters: road,
                        eta_text: Some(format!("{} mins", (road / 500.0).ceil() as u64)),
                    })
                })
                .collect()),
        }
    }
}

/// Replies with a fixed text, or fails with an API error.
pub struct FakeLlm {
    reply: Result<String, u16>,
    prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for FakeLlm {
    async fn generate(&self, _model: &str, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(|status| LlmError::Api {
            status,
            message: "model overloaded".to_string(),
        })
    }
}
