//! QA engine - direct and incremental question answering
//!
//! The engine owns no global state: the transport client, model and
//! sampling settings are injected at construction, and token usage is
//! metered per run in a value scoped to the call, so a failed run can
//! never leak counts into the next one.

use std::sync::Arc;

use tracing::{debug, info};

use super::chunker::split_text;
use super::prompts::{NO_SUMMARY_SENTINEL, QaPrompts};
use super::QaError;
use crate::llm::{CompletionRequest, LlmClient, Message, TokenUsage};

/// System prompt shared by all QA calls
const QA_SYSTEM_PROMPT: &str = "You are a careful assistant analyzing files from a cloned GitHub repository.";

/// One completed question-answering run
#[derive(Debug, Clone)]
pub struct QaResponse {
    /// The generated answer text
    pub answer: String,

    /// Model identifier that produced it
    pub model: String,

    /// Cumulative token usage across every call in the run
    pub usage: TokenUsage,

    /// Whether the source content was cut off before analysis
    ///
    /// Set by the file-QA dispatcher when the read hit the configured
    /// size cap; always false for runs over in-memory text.
    pub truncated: bool,
}

/// Per-run token accounting scope
///
/// Created at run start, fed once per transport call, read out exactly
/// once at the end. Being a plain local value, it is finalized on every
/// exit path including early `?` returns.
struct UsageMeter {
    total: TokenUsage,
}

impl UsageMeter {
    fn new() -> Self {
        Self {
            total: TokenUsage::default(),
        }
    }

    fn record(&mut self, usage: &TokenUsage) {
        self.total.add(usage);
    }

    fn finalize(self) -> TokenUsage {
        self.total
    }
}

/// Question answering over text bodies of any size
///
/// Small texts are answered with a single call; texts exceeding the
/// chunk threshold go through strictly sequential incremental
/// summarization. Dispatch between the two is the caller's job (see
/// `Workspace::fileqa`); the chunked entry point rejects undersized
/// input rather than silently degrading.
pub struct QaEngine {
    client: Arc<dyn LlmClient>,
    prompts: QaPrompts,
    max_tokens: u32,
    temperature: f32,
}

impl QaEngine {
    /// Create an engine bound to a transport client
    pub fn new(client: Arc<dyn LlmClient>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            client,
            prompts: QaPrompts::new(),
            max_tokens,
            temperature,
        }
    }

    /// One transport call; usage lands in the run's meter
    async fn call(&self, prompt: String, meter: &mut UsageMeter) -> Result<String, QaError> {
        let request = CompletionRequest {
            system_prompt: QA_SYSTEM_PROMPT.to_string(),
            messages: vec![Message::user(prompt)],
            tools: vec![],
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
        };

        let response = self.client.complete(request).await.map_err(QaError::Transport)?;
        meter.record(&response.usage);
        Ok(response.text()?.to_string())
    }

    /// Answer a question over content that fits in one call
    pub async fn answer_direct(&self, question: &str, text: &str, source_path: &str) -> Result<QaResponse, QaError> {
        debug!(%source_path, text_chars = text.chars().count(), "answer_direct: called");
        let mut meter = UsageMeter::new();

        let prompt = self.prompts.direct_qa(source_path, question, text)?;
        let answer = self.call(prompt, &mut meter).await?;

        let usage = meter.finalize();
        info!(
            %source_path,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "answer_direct: run complete"
        );
        Ok(QaResponse {
            answer,
            model: self.client.model().to_string(),
            usage,
            truncated: false,
        })
    }

    /// Answer a question over content too large for one call
    ///
    /// The text is chunked and folded into a running summary, one call
    /// per chunk in document order; each call's input depends on the
    /// previous call's output, so chunks are never processed in
    /// parallel. A final call answers from the accumulated summary.
    ///
    /// # Errors
    ///
    /// `QaError::InvalidArgument` if the text does not exceed
    /// `chunk_size` - that case belongs on the direct path and reaching
    /// here means the dispatch above went wrong.
    pub async fn answer_map_reduce(
        &self,
        question: &str,
        text: &str,
        source_path: &str,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Result<QaResponse, QaError> {
        let text_chars = text.chars().count();
        debug!(%source_path, text_chars, chunk_size, chunk_overlap, "answer_map_reduce: called");

        if text_chars <= chunk_size {
            return Err(QaError::InvalidArgument(format!(
                "text must exceed chunk_size: {} is not > {}",
                text_chars, chunk_size
            )));
        }

        let chunks = split_text(text, chunk_size, chunk_overlap)?;
        let mut meter = UsageMeter::new();

        let mut summary = NO_SUMMARY_SENTINEL.to_string();
        for (i, chunk) in chunks.iter().enumerate() {
            debug!(chunk = i + 1, total = chunks.len(), "answer_map_reduce: folding chunk");
            let prompt = self.prompts.summarize_chunk(source_path, question, chunk, &summary)?;
            summary = self.call(prompt, &mut meter).await?;
        }

        let prompt = self.prompts.read_summary(source_path, question, &summary)?;
        let answer = self.call(prompt, &mut meter).await?;

        let usage = meter.finalize();
        info!(
            %source_path,
            chunks = chunks.len(),
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "answer_map_reduce: run complete"
        );
        Ok(QaResponse {
            answer,
            model: self.client.model().to_string(),
            usage,
            truncated: false,
        })
    }
}
