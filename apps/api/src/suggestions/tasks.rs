//! Task title suggestions from free-form user input.

use std::collections::HashSet;

use tracing::warn;

use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{CallOptions, LanguageModel, LlmError, LlmOutput};
use crate::suggestions::prompts::SUGGEST_TASKS_PROMPT_TEMPLATE;

pub const MAX_TASK_SUGGESTIONS: usize = 5;

/// Asks the model for task titles and returns only the ones that pass
/// validation. A reply in the wrong shape yields an empty list, not an error.
pub async fn suggest_tasks(
    llm: &dyn LanguageModel,
    model: &str,
    user_input: &str,
) -> Result<Vec<String>, LlmError> {
    let prompt = render(
        SUGGEST_TASKS_PROMPT_TEMPLATE,
        &[("user_input", user_input), ("json_only", JSON_ONLY_INSTRUCTION)],
    );
    let output = llm.call(model, &prompt, CallOptions::json()).await?;
    Ok(task_titles_from(output))
}

/// The reply must be a JSON array of strings; anything else is treated as empty.
/// Titles are trimmed, blanks and case-insensitive repeats dropped, and the
/// list capped at `MAX_TASK_SUGGESTIONS`.
pub fn task_titles_from(output: LlmOutput) -> Vec<String> {
    let titles: Vec<String> = match output {
        LlmOutput::Structured(value) => match serde_json::from_value(value) {
            Ok(titles) => titles,
            Err(e) => {
                warn!("Task suggestions failed validation: {e}");
                return Vec::new();
            }
        },
        LlmOutput::Text(text) => {
            warn!("Task suggestions were not JSON: {text}");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    titles
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_lowercase()))
        .take(MAX_TASK_SUGGESTIONS)
        .collect()
}
