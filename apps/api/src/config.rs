use std::str::FromStr;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODEL;
use crate::locations::radius_search::RadiusSchedule;
use crate::locations::SearchSettings;

pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const GOOGLE_MAPS_API_KEY: &str = "GOOGLE_MAPS_API_KEY";

/// Application configuration loaded from environment variables.
///
/// Both API keys are optional at startup: a missing key is logged, and every
/// request that needs it fails fast with a 500.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub google_maps_api_key: Option<String>,
    pub llm_model: String,
    pub gemini_base_url: Option<String>,
    pub google_maps_base_url: Option<String>,
    pub http_timeout_secs: u64,
    pub search: SearchSettings,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let defaults = SearchSettings::default();
        let schedule = RadiusSchedule {
            initial_meters: parse_or(&var, "SEARCH_INITIAL_RADIUS_M", defaults.schedule.initial_meters)?,
            step_meters: parse_or(&var, "SEARCH_RADIUS_STEP_M", defaults.schedule.step_meters)?,
            ceiling_meters: parse_or(&var, "SEARCH_CEILING_RADIUS_M", defaults.schedule.ceiling_meters)?,
        };
        let search = SearchSettings {
            schedule,
            max_results: parse_or(&var, "SEARCH_MAX_RESULTS", defaults.max_results)?,
            candidate_limit: parse_or(&var, "SEARCH_CANDIDATE_LIMIT", defaults.candidate_limit)?,
            find_default_radius_meters: parse_or(
                &var,
                "FIND_DEFAULT_RADIUS_M",
                defaults.find_default_radius_meters,
            )?,
            find_max_radius_meters: parse_or(&var, "FIND_MAX_RADIUS_M", defaults.find_max_radius_meters)?,
            require_origin: parse_or(&var, "REQUIRE_USER_LOCATION", defaults.require_origin)?,
        };

        Ok(Config {
            gemini_api_key: var(GEMINI_API_KEY),
            google_maps_api_key: var(GOOGLE_MAPS_API_KEY),
            llm_model: var("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: var("GEMINI_BASE_URL"),
            google_maps_base_url: var("GOOGLE_MAPS_BASE_URL"),
            http_timeout_secs: parse_or(&var, "HTTP_TIMEOUT_SECS", 30)?,
            search,
            port: parse_or(&var, "PORT", 8080)?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(var: impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
