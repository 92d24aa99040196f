use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::places::ProviderUnavailable;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0} missing on server")]
    ConfigurationMissing(&'static str),

    #[error("{0}")]
    ProviderUnavailable(#[from] ProviderUnavailable),

    #[error("{0}")]
    Llm(#[from] LlmError),

    #[error("{0}")]
    NotFound(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConfigurationMissing(_)
            | AppError::ProviderUnavailable(_)
            | AppError::Llm(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::ConfigurationMissing(key) => tracing::error!("Configuration missing: {key}"),
            AppError::ProviderUnavailable(e) => tracing::error!("Place provider error: {e}"),
            AppError::Llm(e) => tracing::error!("LLM error: {e}"),
            _ => {}
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
