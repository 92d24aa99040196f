pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::locations::handlers as locations;
use crate::state::AppState;
use crate::suggestions::handlers as suggestions;

/// Success envelope shared by every API route: `{"success": true, "data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Trimmed value of a required text field, or 400 `"Missing <field>"`.
pub fn required_text(value: Option<&str>, field: &str) -> Result<String, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::InvalidInput(format!("Missing {field}")))
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/suggest-tasks",
            post(suggestions::handle_suggest_tasks).fallback(method_not_allowed),
        )
        .route(
            "/api/suggest-task-category",
            post(suggestions::handle_suggest_task_category).fallback(method_not_allowed),
        )
        .route(
            "/api/suggest-locations",
            post(locations::handle_suggest_locations).fallback(method_not_allowed),
        )
        .route(
            "/api/find-task-location",
            post(locations::handle_find_task_location).fallback(method_not_allowed),
        )
        .with_state(state)
}
