//! LlmClient trait - the transport seam

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// A transport capable of serving completion requests
///
/// Implementations own retry/backoff for transient failures; callers
/// above this seam treat any returned error as fatal for the run.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Execute one completion request
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Model identifier this client is bound to
    fn model(&self) -> &str;
}
