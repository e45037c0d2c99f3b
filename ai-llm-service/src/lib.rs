//! Shared chat-completion client: environment-driven profiles, unified
//! errors, an event-stream decoder and a library-scoped tracing layer.

pub mod config;
pub mod error_handler;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, Result};
pub use service_profiles::LlmServiceProfiles;
pub use services::{
    chat_completion_service::ChatCompletionService,
    stream_decoder::{DeltaStream, FrameDecoder, decode_stream},
};
