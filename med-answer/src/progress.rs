//! Progress reporting for a running query.
//!
//! Use `NoopProgress` when nobody watches, `ChannelProgress` to forward events
//! to another task, or implement [`Progress`] for a UI.

use tokio::sync::mpsc::UnboundedSender;

use crate::{api_types::QueryOutcome, classify::QueryCategory};

/// Callbacks invoked by the pipeline while a query runs.
pub trait Progress: Send + Sync {
    /// Body text so far (never the sources block). Called once per delta.
    fn partial(&self, _category: QueryCategory, _body: &str) {}
    /// The query completed.
    fn finished(&self, _outcome: &QueryOutcome) {}
    /// The query failed; `message` is user-facing.
    fn failed(&self, _message: &str) {}
}

/// No-op reporter.
#[derive(Default, Clone, Copy)]
pub struct NoopProgress;
impl Progress for NoopProgress {}

/// Owned form of the [`Progress`] callbacks.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Partial {
        category: QueryCategory,
        body: String,
    },
    Finished(Box<QueryOutcome>),
    Failed(String),
}

/// Forwards every callback into an unbounded Tokio channel.
///
/// Events sent after the receiver is dropped are discarded.
#[derive(Clone)]
pub struct ChannelProgress {
    tx: UnboundedSender<ProgressEvent>,
}

impl ChannelProgress {
    pub fn new(tx: UnboundedSender<ProgressEvent>) -> Self {
        Self { tx }
    }
}

impl Progress for ChannelProgress {
    fn partial(&self, category: QueryCategory, body: &str) {
        let _ = self.tx.send(ProgressEvent::Partial {
            category,
            body: body.to_string(),
        });
    }
    fn finished(&self, outcome: &QueryOutcome) {
        let _ = self.tx.send(ProgressEvent::Finished(Box::new(outcome.clone())));
    }
    fn failed(&self, message: &str) {
        let _ = self.tx.send(ProgressEvent::Failed(message.to_string()));
    }
}
