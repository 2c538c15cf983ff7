//! File question-answering core
//!
//! The one real algorithm in this crate: answering a question about a
//! body of text that may not fit in a single model call. Small texts
//! go through a single direct call; large texts are split into
//! overlapping chunks and folded into a running summary, one strictly
//! sequential call per chunk, before a final answer call.
//!
//! # Modules
//!
//! - [`chunker`] - overlapping character windows with soft-boundary snapping
//! - [`engine`] - direct and incremental QA paths plus token accounting
//! - [`prompts`] - embedded Handlebars templates for the three call kinds

pub mod chunker;
pub mod engine;
pub mod prompts;

use thiserror::Error;

use crate::llm::LlmError;

pub use chunker::split_text;
pub use engine::{QaEngine, QaResponse};

/// Errors from the QA core
#[derive(Debug, Error)]
pub enum QaError {
    /// Input contract violation (sizes, thresholds)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The model transport failed; propagated verbatim, never retried here
    #[error("Transport failure: {0}")]
    Transport(#[from] LlmError),

    /// A prompt template failed to render
    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),
}
