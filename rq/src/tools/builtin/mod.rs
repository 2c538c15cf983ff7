//! Built-in tools available to the chat agent

mod file_qa;
mod run_script;
mod search_path;
mod wolfi_search;

pub use file_qa::FileQaTool;
pub use run_script::RunScriptTool;
pub use search_path::SearchPathTool;
pub use wolfi_search::WolfiSearchTool;
