//! Shared completion service with two profiles: `answer` and `followup`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - `answer` is used for the streamed user-facing reply, `followup` for the
//!   short non-streaming suggestion call.
//! - If the `followup` profile is not provided, it falls back to `answer`.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use futures::StreamExt;
//! use ai_llm_service::service_profiles::LlmServiceProfiles;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let svc = Arc::new(LlmServiceProfiles::from_env()?);
//!
//!     let mut deltas = svc.stream_answer("What is semaglutide?", None).await?;
//!     while let Some(delta) = deltas.next().await {
//!         print!("{}", delta?);
//!     }
//!
//!     let txt = svc.generate_followup("Suggest one question.", None).await?;
//!     println!("FOLLOWUP: {txt}");
//!     Ok(())
//! }
//! ```

use crate::{
    config::{
        default_config::{config_answer, config_followup},
        llm_model_config::LlmModelConfig,
    },
    error_handler::AiLlmError,
    services::{chat_completion_service::ChatCompletionService, stream_decoder::DeltaStream},
};

/// Shared service that manages the two logical completion profiles.
#[derive(Debug, Clone)]
pub struct LlmServiceProfiles {
    answer: ChatCompletionService,
    followup: ChatCompletionService,
}

impl LlmServiceProfiles {
    /// Creates a new service from explicit profiles.
    ///
    /// - `answer`: required profile for streamed answers.
    /// - `followup_opt`: optional profile for follow-up suggestions. If `None`, falls back to `answer`.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if either client cannot be built.
    pub fn new(
        answer: LlmModelConfig,
        followup_opt: Option<LlmModelConfig>,
    ) -> Result<Self, AiLlmError> {
        let followup = followup_opt.unwrap_or_else(|| answer.clone());
        Ok(Self {
            answer: ChatCompletionService::new(answer)?,
            followup: ChatCompletionService::new(followup)?,
        })
    }

    /// Builds both profiles from environment variables (see `default_config`).
    pub fn from_env() -> Result<Self, AiLlmError> {
        Self::new(config_answer()?, Some(config_followup()?))
    }

    /// Streams an answer using the **answer** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if the request cannot be sent or is refused.
    pub async fn stream_answer(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<DeltaStream, AiLlmError> {
        self.answer.stream(prompt, system).await
    }

    /// Generates text with the **followup** profile (non-streaming).
    pub async fn generate_followup(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, AiLlmError> {
        self.followup.generate(prompt, system).await
    }

    /// Returns references to the current profiles `(answer, followup)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (self.answer.config(), self.followup.config())
    }
}
