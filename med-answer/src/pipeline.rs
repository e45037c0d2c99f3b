//! Per-query orchestration: classify, stream, split, link, suggest follow-ups.
//!
//! ```text
//! Idle → Classifying → Streaming ⇄ Splitting → Linking → [GeneratingFollowups] → Done
//!   └──────────────────────┴──────────→ Errored
//! ```
//!
//! Each call to [`AnswerPipeline::process_query`] owns its own splitter state,
//! so one pipeline can serve concurrent queries. Dropping the returned future
//! drops the HTTP body stream and with it the pending read.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Instant,
};

use ai_llm_service::LlmServiceProfiles;
use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::{
    api_types::{CitedAnswer, FollowupSet, QueryOrigin, QueryOutcome},
    cfg::PipelineConfig,
    citations, classify,
    error::AnswerError,
    followups,
    llm::CompletionBackend,
    progress::Progress,
    prompt::answer_system_prompt,
    splitter::SourceSplitter,
};

/// Lifecycle of a single query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Classifying,
    Streaming,
    Splitting,
    Linking,
    GeneratingFollowups,
    Done,
    Errored,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Logs state transitions for one query.
struct Tracker {
    query_id: u64,
    state: PipelineState,
}

impl Tracker {
    fn new(query_id: u64) -> Self {
        Self {
            query_id,
            state: PipelineState::Idle,
        }
    }

    fn enter(&mut self, next: PipelineState) {
        if self.state != next {
            debug!(query_id = self.query_id, from = %self.state, to = %next, "state transition");
            self.state = next;
        }
    }
}

static NEXT_QUERY_ID: AtomicU64 = AtomicU64::new(1);

/// Streaming answer pipeline.
///
/// Holds only configuration and a shared backend; all per-query state lives
/// inside [`process_query`](Self::process_query).
pub struct AnswerPipeline {
    backend: Arc<dyn CompletionBackend>,
    cfg: PipelineConfig,
    system_prompt: String,
}

impl AnswerPipeline {
    pub fn new(backend: Arc<dyn CompletionBackend>, cfg: PipelineConfig) -> Self {
        let system_prompt = answer_system_prompt(&cfg.separator);
        Self {
            backend,
            cfg,
            system_prompt,
        }
    }

    /// Builds the pipeline and its HTTP backend from environment variables.
    ///
    /// # Errors
    /// [`AnswerError::Config`] when credentials or settings are missing/invalid.
    pub fn from_env() -> Result<Self, AnswerError> {
        let profiles = LlmServiceProfiles::from_env()?;
        let (answer, followup) = profiles.profiles();
        info!(
            answer_model = %answer.model,
            followup_model = %followup.model,
            endpoint = %answer.endpoint,
            "completion profiles loaded"
        );
        Ok(Self::new(Arc::new(profiles), PipelineConfig::from_env()))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    /// Runs one query to completion.
    ///
    /// `progress` receives a partial body after every streamed delta, then
    /// exactly one of `finished` / `failed`.
    ///
    /// # Errors
    /// - [`AnswerError::InvalidInput`] for a blank query (no network call is made)
    /// - [`AnswerError::Transport`], [`AnswerError::UpstreamRefusal`],
    ///   [`AnswerError::Config`] from the streaming call
    pub async fn process_query(
        &self,
        raw_query: &str,
        origin: QueryOrigin,
        progress: &dyn Progress,
    ) -> Result<QueryOutcome, AnswerError> {
        let query_id = NEXT_QUERY_ID.fetch_add(1, Ordering::Relaxed);
        let mut tracker = Tracker::new(query_id);

        match self.run(raw_query, origin, progress, &mut tracker).await {
            Ok(outcome) => {
                tracker.enter(PipelineState::Done);
                progress.finished(&outcome);
                Ok(outcome)
            }
            Err(e) => {
                tracker.enter(PipelineState::Errored);
                warn!(query_id, error = %e, "query failed");
                progress.failed(&e.user_message());
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        raw_query: &str,
        origin: QueryOrigin,
        progress: &dyn Progress,
        tracker: &mut Tracker,
    ) -> Result<QueryOutcome, AnswerError> {
        let query = raw_query.trim();
        if query.is_empty() {
            return Err(AnswerError::InvalidInput);
        }
        let started = Instant::now();

        tracker.enter(PipelineState::Classifying);
        let category = classify::classify(query);
        info!(query_id = tracker.query_id, %category, ?origin, "processing query");

        tracker.enter(PipelineState::Streaming);
        let mut deltas = self.backend.stream_answer(&self.system_prompt, query).await?;

        let mut splitter = SourceSplitter::new(self.cfg.separator.as_str());
        let mut count = 0usize;
        while let Some(delta) = deltas.next().await {
            let delta = delta?;
            count += 1;
            tracker.enter(PipelineState::Splitting);
            splitter.feed(&delta);
            progress.partial(category, &splitter.partial().body_text);
            tracker.enter(PipelineState::Streaming);
        }
        drop(deltas);

        let partial = splitter.finish();
        debug!(
            query_id = tracker.query_id,
            deltas = count,
            body_len = partial.body_text.len(),
            sources_len = partial.sources_text.len(),
            in_sources = partial.in_sources_section,
            "stream finished"
        );

        tracker.enter(PipelineState::Linking);
        let (body, sources) = citations::link(&partial.body_text, &partial.sources_text);
        let answered = !body.trim().is_empty();
        let answer = if answered {
            CitedAnswer::new(body, sources, category)
        } else {
            warn!(query_id = tracker.query_id, "model returned no answer text");
            CitedAnswer::new(self.cfg.empty_answer_message.clone(), Vec::new(), category)
        };

        // no suggestions for the apology text
        let followups = if answered && origin == QueryOrigin::TopLevel && self.cfg.followups_enabled {
            tracker.enter(PipelineState::GeneratingFollowups);
            followups::generate(self.backend.as_ref(), query, answer.body_text()).await
        } else {
            FollowupSet::empty()
        };

        info!(
            query_id = tracker.query_id,
            %category,
            sources = answer.sources().len(),
            followups = followups.len(),
            latency_ms = started.elapsed().as_millis(),
            "query answered"
        );

        Ok(QueryOutcome {
            query: query.to_string(),
            origin,
            answer,
            followups,
        })
    }
}
