//! Streaming answer pipeline for GLP-1 medication questions.
//!
//! A question is classified, sent to the completion API as a streamed
//! request, split into answer body and source list as text arrives, and
//! finally rewritten so inline `[n]` markers link to their sources. Top-level
//! questions additionally get up to three follow-up suggestions.
//!
//! Typical usage:
//! ```no_run
//! use med_answer::{AnswerPipeline, NoopProgress, QueryOrigin};
//!
//! # async fn run() -> Result<(), med_answer::AnswerError> {
//! let pipeline = AnswerPipeline::from_env()?;
//! let out = pipeline
//!     .process_query("What is the dosage for Ozempic?", QueryOrigin::TopLevel, &NoopProgress)
//!     .await?;
//! println!("[{}] {}", out.answer.category(), out.answer.body_text());
//! # Ok(())
//! # }
//! ```

pub mod api_types;
pub mod cfg;
pub mod citations;
pub mod classify;
pub mod error;
pub mod followups;
pub mod history;
pub mod llm;
pub mod pipeline;
pub mod progress;
pub mod prompt;
pub mod splitter;

pub use api_types::{CitedAnswer, FollowupSet, MAX_FOLLOWUPS, QueryOrigin, QueryOutcome, Source};
pub use cfg::PipelineConfig;
pub use citations::{link, parse_sources};
pub use classify::{QueryCategory, classify};
pub use error::AnswerError;
pub use history::{History, HistoryEntry};
pub use llm::CompletionBackend;
pub use pipeline::{AnswerPipeline, PipelineState};
pub use progress::{ChannelProgress, NoopProgress, Progress, ProgressEvent};
pub use splitter::{PartialAnswer, SourceSplitter};
