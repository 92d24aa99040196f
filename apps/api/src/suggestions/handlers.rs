use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::routes::{required_text, ApiResponse};
use crate::state::AppState;
use crate::suggestions::category::{suggest_category, CategorySuggestion};
use crate::suggestions::tasks::suggest_tasks;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestTasksRequest {
    pub user_input: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestCategoryRequest {
    pub task_title: Option<String>,
}

/// POST /api/suggest-tasks
pub async fn handle_suggest_tasks(
    State(state): State<AppState>,
    payload: Result<Json<SuggestTasksRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<String>>>, AppError> {
    let llm = state.llm()?;
    let Json(req) = payload?;
    let user_input = required_text(req.user_input.as_deref(), "userInput")?;

    let titles = suggest_tasks(llm, &state.config.llm_model, &user_input).await?;
    Ok(Json(ApiResponse::ok(titles)))
}

/// POST /api/suggest-task-category
pub async fn handle_suggest_task_category(
    State(state): State<AppState>,
    payload: Result<Json<SuggestCategoryRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CategorySuggestion>>, AppError> {
    let llm = state.llm()?;
    let Json(req) = payload?;
    let task_title = required_text(req.task_title.as_deref(), "taskTitle")?;

    let suggestion = suggest_category(llm, &state.config.llm_model, &task_title).await?;
    Ok(Json(ApiResponse::ok(suggestion)))
}
