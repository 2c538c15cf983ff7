//! Terminal display for chat turns and tool activity
//!
//! Tool announcements go through a typed [`ToolInvocation`] so the
//! compiler enforces that every tool the executor registers has a
//! display arm; an unregistered name falls into `Unknown` instead of
//! silently printing nothing.

use colored::Colorize;

use crate::llm::ToolCall;
use crate::tools::ToolResult;

/// Max characters of a tool result echoed to the terminal
const RESULT_DISPLAY_CAP: usize = 2000;

/// A tool call decoded for display purposes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInvocation {
    FileQa { question: String, file_path: String },
    SearchPath { pattern: String },
    RunScript { dep_count: usize },
    WolfiSearch { keyword: String },
    Unknown { name: String },
}

impl ToolInvocation {
    /// Decode a raw tool call into its display form
    pub fn from_call(call: &ToolCall) -> Self {
        let str_arg = |key: &str| call.input[key].as_str().unwrap_or("?").to_string();
        match call.name.as_str() {
            "file_qa" => ToolInvocation::FileQa {
                question: str_arg("question"),
                file_path: str_arg("file_path"),
            },
            "search_path" => ToolInvocation::SearchPath {
                pattern: str_arg("pattern"),
            },
            "run_script" => ToolInvocation::RunScript {
                dep_count: call.input["dependencies"].as_array().map_or(0, |a| a.len()),
            },
            "search_wolfi" => ToolInvocation::WolfiSearch {
                keyword: str_arg("keyword"),
            },
            _ => ToolInvocation::Unknown {
                name: call.name.clone(),
            },
        }
    }
}

impl std::fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolInvocation::FileQa { question, file_path } => {
                write!(f, "asking {}: {}", file_path, question)
            }
            ToolInvocation::SearchPath { pattern } => write!(f, "searching paths: {}", pattern),
            ToolInvocation::RunScript { dep_count } => {
                write!(f, "running script ({} dependencies)", dep_count)
            }
            ToolInvocation::WolfiSearch { keyword } => write!(f, "searching wolfi packages: {}", keyword),
            ToolInvocation::Unknown { name } => write!(f, "unknown tool: {}", name),
        }
    }
}

/// Announce a tool call before it runs
pub fn display_tool_invocation(invocation: &ToolInvocation) {
    println!();
    println!("{} {}", "Tool:".bright_yellow(), invocation.to_string().bright_white());
}

/// Echo a tool result after it runs
pub fn display_tool_result(result: &ToolResult) {
    if result.is_error {
        println!("{} {}", "Error:".red(), result.content);
    } else {
        let shown: String = result.content.chars().take(RESULT_DISPLAY_CAP).collect();
        if result.content.chars().count() > RESULT_DISPLAY_CAP {
            println!(
                "{}",
                format!("{}... ({} chars total)", shown, result.content.len()).dimmed()
            );
        } else {
            println!("{}", shown.dimmed());
        }
    }
}

/// Print an assistant reply
pub fn display_response(text: &str) {
    println!("{}", text.bright_blue());
}

/// Echo one live sandbox output line
pub fn display_script_line(line: &str) {
    println!("{}", line.dimmed());
}
