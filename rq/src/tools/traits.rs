//! Tool trait and result type

use async_trait::async_trait;
use serde_json::Value;

use super::ToolContext;

/// Result of a tool execution
///
/// Errors are data, not control flow: a failed tool run goes back to
/// the model as an error-flagged result so it can correct course.
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    /// Create an error result
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

/// A tool callable by the model
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name as exposed to the model
    fn name(&self) -> &'static str;

    /// Human-readable description for the model
    fn description(&self) -> &'static str;

    /// JSON schema for the tool's input
    fn input_schema(&self) -> Value;

    /// Execute the tool with the given input
    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult;
}
