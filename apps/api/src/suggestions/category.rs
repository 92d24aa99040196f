//! Task categorization into a closed set of categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{CallOptions, LanguageModel, LlmError, LlmOutput};
use crate::suggestions::prompts::CATEGORIZE_TASK_PROMPT_TEMPLATE;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskCategory {
    Work,
    Personal,
    Shopping,
    Errands,
    Health,
    #[default]
    Other,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 6] = [
        TaskCategory::Work,
        TaskCategory::Personal,
        TaskCategory::Shopping,
        TaskCategory::Errands,
        TaskCategory::Health,
        TaskCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskCategory::Work => "Work",
            TaskCategory::Personal => "Personal",
            TaskCategory::Shopping => "Shopping",
            TaskCategory::Errands => "Errands",
            TaskCategory::Health => "Health",
            TaskCategory::Other => "Other",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl FromStr for TaskCategory {
    type Err = UnknownCategory;

    /// Case-insensitive; surrounding whitespace, quotes and a trailing period are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .trim_end_matches('.')
            .trim();
        TaskCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(cleaned))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySuggestion {
    pub category: TaskCategory,
}

#[derive(Debug, Deserialize)]
struct CategoryPayload {
    category: String,
}

pub async fn suggest_category(
    llm: &dyn LanguageModel,
    model: &str,
    task_title: &str,
) -> Result<CategorySuggestion, LlmError> {
    let categories = TaskCategory::ALL.map(TaskCategory::as_str).join(", ");
    let prompt = render(
        CATEGORIZE_TASK_PROMPT_TEMPLATE,
        &[
            ("task_title", task_title),
            ("categories", &categories),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    );
    let output = llm.call(model, &prompt, CallOptions::json()).await?;
    Ok(CategorySuggestion {
        category: category_from(output),
    })
}

/// Accepts `{"category": "<name>"}` or a bare category word; everything else is `Other`.
pub fn category_from(output: LlmOutput) -> TaskCategory {
    let label = match output {
        LlmOutput::Structured(value @ Value::Object(_)) => {
            match serde_json::from_value::<CategoryPayload>(value) {
                Ok(payload) => payload.category,
                Err(e) => {
                    warn!("Category reply failed validation: {e}");
                    return TaskCategory::Other;
                }
            }
        }
        // Derived structs also deserialize from arrays; only an object is a valid reply.
        LlmOutput::Structured(other) => {
            warn!("Category reply is not an object: {other}");
            return TaskCategory::Other;
        }
        LlmOutput::Text(text) => text,
    };

    label.parse().unwrap_or_else(|UnknownCategory(raw)| {
        warn!("Unknown task category from model: {raw}");
        TaskCategory::Other
    })
}
