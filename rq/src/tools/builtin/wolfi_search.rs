//! search_wolfi tool - look up packages in the Wolfi index

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::tools::{Tool, ToolContext, ToolResult};

/// Search the Wolfi package index by keyword
pub struct WolfiSearchTool;

#[async_trait]
impl Tool for WolfiSearchTool {
    fn name(&self) -> &'static str {
        "search_wolfi"
    }

    fn description(&self) -> &'static str {
        "Search the Wolfi package index by keyword, matching package names \
         and descriptions. Use this to find the right apk package name \
         before running a script."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "keyword": {
                    "type": "string",
                    "description": "Keyword to search for"
                }
            },
            "required": ["keyword"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "WolfiSearchTool::execute: called");
        let keyword = match input["keyword"].as_str() {
            Some(k) => k,
            None => return ToolResult::error("keyword is required"),
        };

        match ctx.wolfi.search(keyword) {
            Ok(packages) if packages.is_empty() => {
                ToolResult::success(format!("No packages matched '{}'", keyword))
            }
            Ok(packages) => {
                let lines: Vec<String> = packages
                    .iter()
                    .map(|p| format!("{}: {}", p.name, p.description))
                    .collect();
                ToolResult::success(lines.join("\n"))
            }
            Err(e) => {
                debug!(%e, "WolfiSearchTool::execute: failed");
                ToolResult::error(e.to_string())
            }
        }
    }
}
