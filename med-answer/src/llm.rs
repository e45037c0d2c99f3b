//! Completion backend seam used by the pipeline.

use ai_llm_service::{AiLlmError, DeltaStream, LlmServiceProfiles};
use async_trait::async_trait;

/// The two calls the pipeline makes against a completion API.
///
/// Implemented for [`LlmServiceProfiles`]; tests plug in in-memory fakes.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Opens a streamed answer; resolves once the upstream accepted the request.
    async fn stream_answer(&self, system: &str, prompt: &str) -> Result<DeltaStream, AiLlmError>;

    /// Single non-streaming completion.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, AiLlmError>;
}

#[async_trait]
impl CompletionBackend for LlmServiceProfiles {
    async fn stream_answer(&self, system: &str, prompt: &str) -> Result<DeltaStream, AiLlmError> {
        LlmServiceProfiles::stream_answer(self, prompt, Some(system)).await
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, AiLlmError> {
        self.generate_followup(prompt, Some(system)).await
    }
}
