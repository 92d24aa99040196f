mod config;
mod errors;
mod geo;
mod llm_client;
mod locations;
mod places;
mod routes;
mod state;
mod suggestions;
#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, GEMINI_API_KEY, GOOGLE_MAPS_API_KEY};
use crate::llm_client::{LanguageModel, LlmClient};
use crate::places::{GoogleMapsClient, PlaceProvider};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Taskmate API v{}", env!("CARGO_PKG_VERSION"));

    let llm = build_llm_client(&config)?;
    let places = build_places_client(&config)?;

    let state = AppState {
        llm,
        places,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `None` without a key; the suggestion routes then answer 500 per request.
fn build_llm_client(config: &Config) -> Result<Option<Arc<dyn LanguageModel>>> {
    let Some(api_key) = config.gemini_api_key.clone() else {
        warn!("{GEMINI_API_KEY} not set, task suggestion routes will fail");
        return Ok(None);
    };

    let client = match &config.gemini_base_url {
        Some(base_url) => LlmClient::with_base_url(api_key, config.http_timeout_secs, base_url)?,
        None => LlmClient::new(api_key, config.http_timeout_secs)?,
    };
    info!("LLM client initialized (model: {})", config.llm_model);
    Ok(Some(Arc::new(client)))
}

/// `None` without a key; the location routes then answer 500 per request.
fn build_places_client(config: &Config) -> Result<Option<Arc<dyn PlaceProvider>>> {
    let Some(api_key) = config.google_maps_api_key.as_deref() else {
        warn!("{GOOGLE_MAPS_API_KEY} not set, location routes will fail");
        return Ok(None);
    };

    let client = match &config.google_maps_base_url {
        Some(base_url) => {
            GoogleMapsClient::with_base_url(api_key, config.http_timeout_secs, base_url)?
        }
        None => GoogleMapsClient::new(api_key, config.http_timeout_secs)?,
    };
    info!(
        "Google Maps client initialized (initial radius {} m)",
        config.search.schedule.initial_meters
    );
    Ok(Some(Arc::new(client)))
}
