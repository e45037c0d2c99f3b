//! Prompt texts for the answer and follow-up calls.

/// System instructions for the streamed answer.
///
/// `{separator}` is replaced by the configured sources separator so the
/// splitter and the model agree on the marker.
const ANSWER_SYSTEM_TEMPLATE: &str = r#"
You are a medical information assistant specialised in GLP-1 receptor agonist medications
(semaglutide, liraglutide, dulaglutide, tirzepatide and related drugs).
Answer the patient's question with evidence-based information in an empathetic, patient-friendly tone.

Structure the answer as:
1. A short opening that acknowledges the patient's situation.
2. Clear medical information addressing the question, using headers and bullet points where they help.
3. An encouraging closing that points the patient back to their healthcare provider.

Add a medical disclaimer when appropriate.
Cite supporting references inline as bracketed numbers: [1], [2], ...
After the answer, write a line containing exactly `{separator}` followed by one reference per line
in the form `<number>. <title>: <url>`, numbered in the order they were cited.
"#;

/// Builds the answer system prompt for the given separator literal.
pub fn answer_system_prompt(separator: &str) -> String {
    ANSWER_SYSTEM_TEMPLATE
        .trim()
        .replace("{separator}", separator)
}

/// System instructions for the follow-up call.
pub const FOLLOWUP_SYSTEM: &str = r#"
You suggest follow-up questions for a patient reading an answer about GLP-1 medications.
Reply with exactly three short questions, one per line, with no numbering, bullets or extra text.
"#;

/// Builds the follow-up user prompt from the original question and the answer body.
pub fn build_followup_prompt(original_query: &str, finished_answer: &str) -> String {
    let mut out = String::new();
    out.push_str("Question:\n");
    out.push_str(original_query.trim());
    out.push_str("\n\nAnswer:\n");
    out.push_str(finished_answer.trim());
    out.push_str("\n\nSuggest three follow-up questions the patient is likely to ask next.\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_is_embedded() {
        let p = answer_system_prompt("References:");
        assert!(p.contains("exactly `References:`"));
        assert!(!p.contains("{separator}"));
    }

    #[test]
    fn followup_prompt_carries_both_parts() {
        let p = build_followup_prompt("  What dose? ", "Start low.\n");
        assert!(p.starts_with("Question:\nWhat dose?\n\nAnswer:\nStart low.\n\n"));
    }
}
