//! Pipeline knobs loaded from environment variables.

use crate::splitter::DEFAULT_SEPARATOR;

/// Shown instead of an empty answer.
pub const EMPTY_ANSWER_MESSAGE: &str =
    "I apologize, but I couldn't generate a response at this time. Please try again.";

/// Config bag for [`AnswerPipeline`](crate::AnswerPipeline).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Literal separating the answer body from the sources block.
    pub separator: String,
    /// Whether top-level queries get follow-up suggestions.
    pub followups_enabled: bool,
    /// Replacement body when the model streamed no prose.
    pub empty_answer_message: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            followups_enabled: true,
            empty_answer_message: EMPTY_ANSWER_MESSAGE.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Build from environment variables with defaults.
    ///
    /// - `SOURCES_SEPARATOR` (default `Sources:`)
    /// - `FOLLOWUPS_ENABLED` (default `true`)
    pub fn from_env() -> Self {
        let dflt = Self::default();
        Self {
            separator: env("SOURCES_SEPARATOR", &dflt.separator),
            followups_enabled: parse("FOLLOWUPS_ENABLED", dflt.followups_enabled),
            empty_answer_message: dflt.empty_answer_message,
        }
    }
}

fn env(k: &str, dflt: &str) -> String {
    std::env::var(k)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| dflt.to_string())
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(dflt)
}
