/// Represents the provider (backend) serving chat completions.
///
/// Both variants speak the OpenAI-compatible `/chat/completions` protocol;
/// the distinction is kept for logs and error attribution.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_provider::LlmProvider;
///
/// assert_eq!(LlmProvider::from_kind("pplx"), Some(LlmProvider::Perplexity));
/// assert_eq!(LlmProvider::from_kind("openai"), Some(LlmProvider::OpenAiCompatible));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Perplexity's hosted API (`https://api.perplexity.ai`).
    Perplexity,
    /// Any other server implementing the OpenAI chat-completions API.
    OpenAiCompatible,
}

impl LlmProvider {
    /// Parses the value of `LLM_KIND`; unknown kinds yield `None`.
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "pplx" | "perplexity" => Some(Self::Perplexity),
            "openai" | "openai-compatible" => Some(Self::OpenAiCompatible),
            _ => None,
        }
    }
}
