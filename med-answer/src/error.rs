//! Typed errors for the answer pipeline.
//!
//! Only the variants below ever reach the caller. Malformed stream frames,
//! unparsable source lines and follow-up failures are absorbed where they
//! happen and only show up in logs.

use ai_llm_service::{
    AiLlmError,
    error_handler::{ProviderError, ProviderErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnswerError {
    /// Blank question; rejected before any network call.
    #[error("query is empty")]
    InvalidInput,

    /// Connection-level failure, including a stream cut off mid-answer.
    #[error("transport error: {0}")]
    Transport(String),

    /// The completion API answered with a non-2xx status.
    #[error("upstream refused the request: HTTP {status}: {snippet}")]
    UpstreamRefusal { status: u16, snippet: String },

    /// Missing or invalid credentials/configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl AnswerError {
    /// Text suitable for showing to the end user.
    pub fn user_message(&self) -> String {
        match self {
            AnswerError::InvalidInput => "Please enter a valid question.".to_string(),
            AnswerError::Transport(_) => {
                "Failed to retrieve information from knowledge base. Please check your connection and try again."
                    .to_string()
            }
            AnswerError::UpstreamRefusal { status, .. } => format!(
                "Failed to retrieve information from knowledge base (the service responded with HTTP {status})."
            ),
            AnswerError::Config(detail) => {
                format!("The assistant is not configured correctly: {detail}")
            }
        }
    }
}

impl From<AiLlmError> for AnswerError {
    fn from(err: AiLlmError) -> Self {
        match err {
            AiLlmError::Config(e) => AnswerError::Config(e.to_string()),
            AiLlmError::Provider(ProviderError { kind, provider }) => match kind {
                ProviderErrorKind::HttpStatus(http) => AnswerError::UpstreamRefusal {
                    status: http.status.as_u16(),
                    snippet: http.snippet,
                },
                kind @ (ProviderErrorKind::MissingApiKey | ProviderErrorKind::InvalidApiKey(_)) => {
                    AnswerError::Config(ProviderError::new(provider, kind).to_string())
                }
                other => AnswerError::Transport(ProviderError::new(provider, other).to_string()),
            },
            AiLlmError::HttpTransport(e) => AnswerError::Transport(e.to_string()),
            AiLlmError::Stream(msg) => AnswerError::Transport(msg),
            other => AnswerError::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::{
        ChatCompletionService, LlmModelConfig, LlmProvider,
        error_handler::{ConfigError, HttpError, StatusCode},
    };

    #[test]
    fn non_success_status_is_refusal() {
        let err = AiLlmError::from(ProviderError::new(
            LlmProvider::Perplexity,
            ProviderErrorKind::HttpStatus(HttpError {
                status: StatusCode::TOO_MANY_REQUESTS,
                url: "http://x".into(),
                snippet: "slow down".into(),
            }),
        ));
        let mapped = AnswerError::from(err);
        assert!(matches!(
            mapped,
            AnswerError::UpstreamRefusal { status: 429, ref snippet } if snippet == "slow down"
        ));
        assert!(mapped.user_message().contains("HTTP 429"));
    }

    #[test]
    fn credential_problems_are_config() {
        let missing_key = AiLlmError::from(ProviderError::new(
            LlmProvider::Perplexity,
            ProviderErrorKind::MissingApiKey,
        ));
        assert!(matches!(AnswerError::from(missing_key), AnswerError::Config(_)));

        let missing_var = AiLlmError::from(ConfigError::MissingVar("PPLX_API_KEY"));
        assert!(matches!(AnswerError::from(missing_var), AnswerError::Config(_)));
    }

    #[test]
    fn unusable_api_key_is_config() {
        let cfg = LlmModelConfig {
            provider: LlmProvider::Perplexity,
            model: "sonar".into(),
            endpoint: "https://api.perplexity.ai".into(),
            api_key: Some("pplx-abc\ndef".into()),
            max_tokens: Some(1000),
            temperature: Some(0.1),
            top_p: None,
            timeout_secs: None,
        };
        let err = ChatCompletionService::new(cfg).expect_err("key cannot form a header");
        let mapped = AnswerError::from(err);

        assert!(matches!(mapped, AnswerError::Config(_)));
        assert!(mapped.user_message().starts_with("The assistant is not configured correctly"));
    }

    #[test]
    fn stream_cut_is_transport() {
        let mapped = AnswerError::from(AiLlmError::Stream("reset by peer".into()));
        assert!(matches!(mapped, AnswerError::Transport(ref m) if m == "reset by peer"));
    }

    #[test]
    fn blank_input_message() {
        assert_eq!(
            AnswerError::InvalidInput.user_message(),
            "Please enter a valid question."
        );
    }
}
