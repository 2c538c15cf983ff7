//! file_qa tool - answer a question about one repository file

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::tools::{Tool, ToolContext, ToolResult};

/// Ask a question about a single file in the cloned repository
pub struct FileQaTool;

#[async_trait]
impl Tool for FileQaTool {
    fn name(&self) -> &'static str {
        "file_qa"
    }

    fn description(&self) -> &'static str {
        "Answer a question about the contents of one file in the repository. \
         Use this instead of asking for raw file contents; large files are \
         analyzed incrementally."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "description": "The question to answer about the file"
                },
                "file_path": {
                    "type": "string",
                    "description": "Path of the file, relative to the repository root"
                }
            },
            "required": ["question", "file_path"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "FileQaTool::execute: called");
        let question = match input["question"].as_str() {
            Some(q) => q,
            None => return ToolResult::error("question is required"),
        };
        let file_path = match input["file_path"].as_str() {
            Some(p) => p,
            None => return ToolResult::error("file_path is required"),
        };

        match ctx.workspace.fileqa(question, file_path).await {
            Ok(response) => {
                info!(
                    %file_path,
                    model = %response.model,
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "FileQaTool::execute: answered"
                );
                if response.truncated {
                    ToolResult::success(format!(
                        "{}\n\n[Note: the file was too large and was truncated before analysis; \
                         the answer covers only its beginning]",
                        response.answer
                    ))
                } else {
                    ToolResult::success(response.answer)
                }
            }
            Err(e) => {
                debug!(%e, "FileQaTool::execute: failed");
                ToolResult::error(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::test_support::{context_over, write_file};

    #[tokio::test]
    async fn test_missing_question_is_error() {
        let (ctx, _guard) = context_over(&[]);
        let result = FileQaTool
            .execute(serde_json::json!({"file_path": "a.txt"}), &ctx)
            .await;
        assert!(result.is_error);
        assert!(result.content.contains("question is required"));
    }

    #[tokio::test]
    async fn test_missing_file_reports_not_found() {
        let (ctx, _guard) = context_over(&[]);
        let result = FileQaTool
            .execute(serde_json::json!({"question": "q", "file_path": "nope.txt"}), &ctx)
            .await;
        assert!(result.is_error);
        assert!(result.content.contains("File not found"));
    }

    #[tokio::test]
    async fn test_answers_question_about_file() {
        let (ctx, guard) = context_over(&[]);
        write_file(&guard, "notes.txt", "hello world");

        let result = FileQaTool
            .execute(serde_json::json!({"question": "what does it say?", "file_path": "notes.txt"}), &ctx)
            .await;
        assert!(!result.is_error);
        assert_eq!(result.content, "scripted reply");
    }
}
