//! Field Extraction Client — pluggable, trait-based extractor from resume text to `ResumeRecord`.
//!
//! Default: `LlmFieldExtractor` (one chat-completion round trip per resume).
//! `AppState` holds an `Arc<dyn FieldExtractor>` so tests can swap in a stub.

use async_trait::async_trait;
use tracing::debug;

use crate::extraction::prompts::build_prompt;
use crate::extraction::schema::{parse_structured_output, ExtractionError};
use crate::llm_client::LlmClient;
use crate::models::resume::ResumeRecord;

#[async_trait]
pub trait FieldExtractor: Send + Sync {
    async fn extract(&self, resume_text: &str) -> Result<ResumeRecord, ExtractionError>;
}

pub struct LlmFieldExtractor {
    llm: LlmClient,
}

impl LlmFieldExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl FieldExtractor for LlmFieldExtractor {
    async fn extract(&self, resume_text: &str) -> Result<ResumeRecord, ExtractionError> {
        let prompt = build_prompt(resume_text);
        let reply = self.llm.complete(&prompt).await?;
        debug!("LLM reply: {} chars", reply.len());
        parse_structured_output(&reply)
    }
}
