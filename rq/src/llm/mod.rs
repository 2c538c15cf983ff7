//! LLM transport for repoqa
//!
//! Provider-agnostic completion requests. The QA engine and the chat
//! agent both talk to the model through the [`LlmClient`] trait so
//! tests can substitute a scripted fake.

use std::sync::Arc;

use tracing::debug;

mod anthropic;
pub mod client;
mod error;
mod openai;
mod types;

pub use anthropic::AnthropicClient;
pub use client::LlmClient;
pub use error::LlmError;
pub use openai::OpenAIClient;
#[allow(unused_imports)]
pub use types::Role;
pub use types::{
    CompletionRequest, CompletionResponse, ContentBlock, Message, MessageContent, StopReason, TokenUsage, ToolCall,
    ToolDefinition,
};

use crate::config::LlmConfig;

/// Create an LLM client for `model` based on the provider in config
///
/// Supports "anthropic" and "openai" providers. The model is passed
/// separately because the agent loop and the file-QA engine may use
/// different models behind the same provider settings.
pub fn create_client(config: &LlmConfig, model: &str) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, %model, "create_client: called");
    match config.provider.as_str() {
        "anthropic" => {
            debug!("create_client: creating Anthropic client");
            Ok(Arc::new(AnthropicClient::from_config(config, model)?))
        }
        "openai" => {
            debug!("create_client: creating OpenAI client");
            Ok(Arc::new(OpenAIClient::from_config(config, model)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::InvalidResponse(format!(
                "Unknown LLM provider: '{}'. Supported: anthropic, openai",
                other
            )))
        }
    }
}
