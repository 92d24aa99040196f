// Task Suggestions: LLM-backed task titles and task categorization.
// All LLM calls go through llm_client; replies are validated here before
// they reach a caller.

pub mod category;
pub mod handlers;
pub mod prompts;
pub mod tasks;
