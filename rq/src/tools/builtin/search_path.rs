//! search_path tool - glob search over the repository tree

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::tools::{Tool, ToolContext, ToolResult};

/// Find files and directories matching a glob pattern
pub struct SearchPathTool;

#[async_trait]
impl Tool for SearchPathTool {
    fn name(&self) -> &'static str {
        "search_path"
    }

    fn description(&self) -> &'static str {
        "Search the repository for files and directories matching a glob \
         pattern, e.g. 'src/*.rs' or '**/Makefile'. Paths are relative to \
         the repository root."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "pattern": {
                    "type": "string",
                    "description": "Glob pattern, relative to the repository root"
                }
            },
            "required": ["pattern"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "SearchPathTool::execute: called");
        let pattern = match input["pattern"].as_str() {
            Some(p) => p,
            None => return ToolResult::error("pattern is required"),
        };

        match ctx.workspace.search(pattern) {
            Ok((dirs, files)) => {
                if dirs.is_empty() && files.is_empty() {
                    ToolResult::success(format!("No paths matched '{}'", pattern))
                } else {
                    ToolResult::success(format!(
                        "Directories: [{}]\nFiles: [{}]",
                        dirs.join(", "),
                        files.join(", ")
                    ))
                }
            }
            Err(e) => {
                debug!(%e, "SearchPathTool::execute: failed");
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
    async fn test_missing_pattern_is_error() {
        let (ctx, _guard) = context_over(&[]);
        let result = SearchPathTool.execute(serde_json::json!({}), &ctx).await;
        assert!(result.is_error);
    }

    #[tokio::test]
    async fn test_lists_matching_files() {
        let (ctx, guard) = context_over(&[]);
        write_file(&guard, "build.sh", "");
        write_file(&guard, "run.sh", "");
        write_file(&guard, "README.md", "");

        let result = SearchPathTool.execute(serde_json::json!({"pattern": "*.sh"}), &ctx).await;
        assert!(!result.is_error);
        assert!(result.content.contains("build.sh"));
        assert!(result.content.contains("run.sh"));
        assert!(!result.content.contains("README.md"));
    }

    #[tokio::test]
    async fn test_no_matches_says_so() {
        let (ctx, _guard) = context_over(&[]);
        let result = SearchPathTool
            .execute(serde_json::json!({"pattern": "*.zig"}), &ctx)
            .await;
        assert!(!result.is_error);
        assert!(result.content.contains("No paths matched"));
    }

    #[tokio::test]
    async fn test_traversal_pattern_is_error() {
        let (ctx, _guard) = context_over(&[]);
        let result = SearchPathTool
            .execute(serde_json::json!({"pattern": "../*"}), &ctx)
            .await;
        assert!(result.is_error);
    }
}
