//! Result types handed to the presentation layer.

use serde::Serialize;

use crate::classify::QueryCategory;

/// One entry of the parsed sources block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    /// 1-based position in the parsed list.
    pub ordinal: usize,
    pub title: String,
    pub url: String,
}

/// Finalized answer: body with citations rewritten, its sources and category.
///
/// Built once per completed query and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitedAnswer {
    body_text: String,
    sources: Vec<Source>,
    category: QueryCategory,
}

impl CitedAnswer {
    pub(crate) fn new(body_text: String, sources: Vec<Source>, category: QueryCategory) -> Self {
        Self {
            body_text,
            sources,
            category,
        }
    }

    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn category(&self) -> QueryCategory {
        self.category
    }
}

/// Upper bound on suggested follow-up questions.
pub const MAX_FOLLOWUPS: usize = 3;

/// Up to [`MAX_FOLLOWUPS`] follow-up questions derived from an answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FollowupSet(Vec<String>);

impl FollowupSet {
    /// Keeps at most the first [`MAX_FOLLOWUPS`] questions.
    pub fn new<I, S>(questions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            questions
                .into_iter()
                .take(MAX_FOLLOWUPS)
                .map(Into::into)
                .collect(),
        )
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn questions(&self) -> &[String] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How a query was launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryOrigin {
    /// Typed by the user.
    TopLevel,
    /// Picked from a previous answer's suggestions; never spawns follow-ups itself.
    Followup,
}

/// Terminal value of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutcome {
    pub query: String,
    pub origin: QueryOrigin,
    pub answer: CitedAnswer,
    pub followups: FollowupSet,
}
