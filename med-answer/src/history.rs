//! Caller-owned conversation history.
//!
//! The pipeline never touches it; the presentation layer appends each
//! completed answer.

use serde::Serialize;

use crate::api_types::CitedAnswer;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub query: String,
    pub answer: CitedAnswer,
}

/// Append-only, ordered list of past answers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, query: impl Into<String>, answer: CitedAnswer) {
        self.entries.push(HistoryEntry {
            query: query.into(),
            answer,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::QueryCategory;

    #[test]
    fn keeps_insertion_order() {
        let mut h = History::new();
        h.push("first", CitedAnswer::new("a".into(), vec![], QueryCategory::General));
        h.push("second", CitedAnswer::new("b".into(), vec![], QueryCategory::Cost));

        let queries: Vec<_> = h.iter().map(|e| e.query.as_str()).collect();
        assert_eq!(queries, ["first", "second"]);
        assert_eq!(h.latest().map(|e| e.answer.category()), Some(QueryCategory::Cost));
        assert_eq!(h.len(), 2);
    }
}
