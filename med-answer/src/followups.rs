//! Best-effort follow-up question suggestions.

use tracing::{debug, warn};

use crate::{
    api_types::FollowupSet,
    llm::CompletionBackend,
    prompt::{FOLLOWUP_SYSTEM, build_followup_prompt},
};

/// Trimmed, non-empty lines of `raw`, capped by [`FollowupSet`].
pub fn parse_followups(raw: &str) -> FollowupSet {
    FollowupSet::new(raw.lines().map(str::trim).filter(|l| !l.is_empty()))
}

/// Asks the backend for follow-up questions about a finished answer.
///
/// Never fails: any error from the call yields an empty set.
pub async fn generate(
    backend: &dyn CompletionBackend,
    original_query: &str,
    finished_answer: &str,
) -> FollowupSet {
    let prompt = build_followup_prompt(original_query, finished_answer);
    match backend.complete(FOLLOWUP_SYSTEM.trim(), &prompt).await {
        Ok(raw) => {
            let set = parse_followups(&raw);
            debug!(count = set.len(), "follow-ups generated");
            set
        }
        Err(e) => {
            warn!(error = %e, "follow-up generation failed; continuing without suggestions");
            FollowupSet::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keeps_first_three_non_blank_trimmed() {
        let raw = "  How long until it works?  \n\n   \nCan I drink alcohol?\nWhat if I miss a dose?\nIs nausea normal?";
        let set = parse_followups(raw);
        assert_eq!(
            set.questions(),
            [
                "How long until it works?",
                "Can I drink alcohol?",
                "What if I miss a dose?"
            ]
        );
    }

    #[test]
    fn empty_reply_gives_empty_set() {
        assert!(parse_followups("\n \n").is_empty());
    }
}
