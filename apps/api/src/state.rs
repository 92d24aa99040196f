use std::sync::Arc;

use crate::config::{Config, GEMINI_API_KEY, GOOGLE_MAPS_API_KEY};
use crate::errors::AppError;
use crate::llm_client::LanguageModel;
use crate::places::PlaceProvider;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once per process; a client is `None` when its API key was not configured.
#[derive(Clone)]
pub struct AppState {
    pub llm: Option<Arc<dyn LanguageModel>>,
    pub places: Option<Arc<dyn PlaceProvider>>,
    pub config: Config,
}

impl AppState {
    /// The LLM client, or a configuration error before any network call.
    pub fn llm(&self) -> Result<&dyn LanguageModel, AppError> {
        self.llm
            .as_deref()
            .ok_or(AppError::ConfigurationMissing(GEMINI_API_KEY))
    }

    /// The place provider, or a configuration error before any network call.
    pub fn places(&self) -> Result<&dyn PlaceProvider, AppError> {
        self.places
            .as_deref()
            .ok_or(AppError::ConfigurationMissing(GOOGLE_MAPS_API_KEY))
    }
}
