//! Keyword-driven topic tagging for incoming questions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Topic tag attached to every answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryCategory {
    Dosage,
    SideEffects,
    Benefits,
    Storage,
    Lifestyle,
    Interactions,
    Cost,
    General,
}

impl QueryCategory {
    /// All categories in tie-break order.
    pub const ALL: [QueryCategory; 8] = [
        QueryCategory::Dosage,
        QueryCategory::SideEffects,
        QueryCategory::Benefits,
        QueryCategory::Storage,
        QueryCategory::Lifestyle,
        QueryCategory::Interactions,
        QueryCategory::Cost,
        QueryCategory::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryCategory::Dosage => "dosage",
            QueryCategory::SideEffects => "side_effects",
            QueryCategory::Benefits => "benefits",
            QueryCategory::Storage => "storage",
            QueryCategory::Lifestyle => "lifestyle",
            QueryCategory::Interactions => "interactions",
            QueryCategory::Cost => "cost",
            QueryCategory::General => "general",
        }
    }
}

impl fmt::Display for QueryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword table, tested top to bottom. `General` is the fallback and has no row.
const KEYWORDS: &[(QueryCategory, &[&str])] = &[
    (
        QueryCategory::Dosage,
        &["dose", "dosage", "how to take", "when to take", "injection", "administration"],
    ),
    (
        QueryCategory::SideEffects,
        &["side effect", "adverse", "reaction", "problem", "issues", "symptoms"],
    ),
    (
        QueryCategory::Benefits,
        &["benefit", "advantage", "help", "work", "effect", "weight", "glucose"],
    ),
    (
        QueryCategory::Storage,
        &["store", "storage", "keep", "refrigerate", "temperature"],
    ),
    (
        QueryCategory::Lifestyle,
        &["diet", "exercise", "lifestyle", "food", "alcohol", "eating"],
    ),
    (
        QueryCategory::Interactions,
        &["interaction", "drug", "medication", "combine", "mixing"],
    ),
    (
        QueryCategory::Cost,
        &["cost", "price", "insurance", "coverage", "afford"],
    ),
];

/// Maps a free-text question to its category.
///
/// Case-insensitive substring match; the first category with any matching
/// keyword wins, anything else is [`QueryCategory::General`].
pub fn classify(query: &str) -> QueryCategory {
    let lowered = query.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lowered.contains(w)))
        .map(|(category, _)| *category)
        .unwrap_or(QueryCategory::General)
}
