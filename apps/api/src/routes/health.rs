use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Service status plus which upstream providers have an API key configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "taskmate-api",
        "providers": {
            "llm": state.llm.is_some(),
            "maps": state.places.is_some(),
        }
    }))
}
