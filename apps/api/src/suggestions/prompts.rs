// LLM prompt templates for the Task Suggestions module.
// Placeholders are filled with llm_client::prompts::render.

/// Task title suggestions. Replace `{user_input}` and `{json_only}`.
pub const SUGGEST_TASKS_PROMPT_TEMPLATE: &str = r#"You are a helpful task assistant.
Based on this input: "{user_input}", suggest 3-5 short, clear, natural-sounding task titles.

Return ONLY a JSON array of strings, for example:
["Buy milk", "Call plumber", "Finish report"]

{json_only}"#;

/// Single-category classification. Replace `{task_title}`, `{categories}` and `{json_only}`.
pub const CATEGORIZE_TASK_PROMPT_TEMPLATE: &str = r#"You are a task categorizer.
Categorize this task: "{task_title}"
Choose only one of the following categories: {categories}.

Return a JSON object with this exact shape:
{ "category": "Work" }

{json_only}"#;
