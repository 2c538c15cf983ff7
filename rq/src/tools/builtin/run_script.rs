//! run_script tool - execute a shell script in the sandbox

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::tools::{Tool, ToolContext, ToolResult};

/// Tail of the transcript returned to the model, in characters
const RESPONSE_TAIL_CHARS: usize = 1000;

/// Run a shell script in a throwaway Wolfi container
pub struct RunScriptTool;

/// Last `n` characters of `s`
fn tail_chars(s: &str, n: usize) -> String {
    let total = s.chars().count();
    s.chars().skip(total.saturating_sub(n)).collect()
}

#[async_trait]
impl Tool for RunScriptTool {
    fn name(&self) -> &'static str {
        "run_script"
    }

    fn description(&self) -> &'static str {
        "Run a shell script inside a fresh Wolfi container. List any apk \
         packages the script needs in dependencies; they are installed \
         first. Returns the tail of the combined output."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "script": {
                    "type": "string",
                    "description": "Shell script body to execute"
                },
                "dependencies": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "apk package names to install before running"
                }
            },
            "required": ["script"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "RunScriptTool::execute: called");
        let script = match input["script"].as_str() {
            Some(s) => s,
            None => return ToolResult::error("script is required"),
        };

        let deps: Vec<String> = input["dependencies"]
            .as_array()
            .map(|a| a.iter().filter_map(|v| v.as_str().map(String::from)).collect())
            .unwrap_or_default();

        let outcome = match ctx
            .sandbox
            .run_script(script, &deps, |line| ctx.echo_script_line(line))
            .await
        {
            Ok(o) => o,
            Err(e) => {
                debug!(%e, "RunScriptTool::execute: sandbox failure");
                return ToolResult::error(e.to_string());
            }
        };

        let tail = tail_chars(&outcome.transcript, RESPONSE_TAIL_CHARS);
        if outcome.success() {
            ToolResult::success(tail)
        } else {
            ToolResult::error(format!(
                "Script exited with code {:?}\n{}",
                outcome.exit_code, tail
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::test_support::context_over;

    #[test]
    fn test_tail_chars() {
        assert_eq!(tail_chars("hello", 2), "lo");
        assert_eq!(tail_chars("hi", 10), "hi");
        assert_eq!(tail_chars("", 5), "");
        // counts characters, not bytes
        assert_eq!(tail_chars("héllo", 4), "éllo");
    }

    #[tokio::test]
    async fn test_missing_script_is_error() {
        let (ctx, _guard) = context_over(&[]);
        let result = RunScriptTool.execute(serde_json::json!({}), &ctx).await;
        assert!(result.is_error);
        assert!(result.content.contains("script is required"));
    }

    #[tokio::test]
    async fn test_empty_script_is_error() {
        let (ctx, _guard) = context_over(&[]);
        let result = RunScriptTool.execute(serde_json::json!({"script": "  "}), &ctx).await;
        assert!(result.is_error);
    }
}
