// Field extraction: prompt construction, the LLM call, and coercion of the
// reply into a `ResumeRecord`. All LLM calls go through llm_client.

pub mod extractor;
pub mod prompts;
pub mod schema;
