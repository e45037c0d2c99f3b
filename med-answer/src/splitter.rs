//! Incremental split of streamed text into answer body and sources block.
//!
//! The separator may arrive cut across two (or more) deltas, so any tail that
//! could still grow into the separator is held back until the next delta (or
//! [`SourceSplitter::finish`]) disambiguates it.

/// Separator emitted by the answer prompt before the source list.
pub const DEFAULT_SEPARATOR: &str = "Sources:";

/// Accumulated text of one in-flight answer.
///
/// Once `in_sources_section` is set it stays set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialAnswer {
    pub body_text: String,
    pub sources_text: String,
    pub in_sources_section: bool,
}

/// Per-query splitter owning its [`PartialAnswer`].
#[derive(Debug)]
pub struct SourceSplitter {
    separator: String,
    acc: PartialAnswer,
    pending: String,
}

impl SourceSplitter {
    /// An empty `separator` never matches: everything lands in the body.
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            acc: PartialAnswer::default(),
            pending: String::new(),
        }
    }

    /// Routes one delta to the body or the sources section.
    pub fn feed(&mut self, delta: &str) {
        if self.acc.in_sources_section {
            self.acc.sources_text.push_str(delta);
            return;
        }
        if self.separator.is_empty() {
            self.acc.body_text.push_str(delta);
            return;
        }

        self.pending.push_str(delta);

        if let Some(idx) = self.pending.find(self.separator.as_str()) {
            self.acc.body_text.push_str(&self.pending[..idx]);
            self.acc
                .sources_text
                .push_str(&self.pending[idx + self.separator.len()..]);
            self.acc.in_sources_section = true;
            self.pending.clear();
            return;
        }

        let held = held_prefix_len(&self.pending, &self.separator);
        let flush = self.pending.len() - held;
        self.acc.body_text.push_str(&self.pending[..flush]);
        self.pending.drain(..flush);
    }

    /// Current state; the held-back tail is not part of `body_text` yet.
    pub fn partial(&self) -> &PartialAnswer {
        &self.acc
    }

    /// Flushes the held-back tail to the active section and returns the result.
    pub fn finish(mut self) -> PartialAnswer {
        if self.acc.in_sources_section {
            self.acc.sources_text.push_str(&self.pending);
        } else {
            self.acc.body_text.push_str(&self.pending);
        }
        self.acc
    }
}

/// Length of the longest proper prefix of `sep` that `text` ends with.
fn held_prefix_len(text: &str, sep: &str) -> usize {
    let max = text.len().min(sep.len().saturating_sub(1));
    (1..=max)
        .rev()
        .find(|&k| sep.is_char_boundary(k) && text.ends_with(&sep[..k]))
        .unwrap_or(0)
}
