//! Tool system for the chat agent
//!
//! Tools give the conversation loop its hands: file QA over the cloned
//! repository, path search, sandboxed script execution, and Wolfi
//! package lookup. Each session gets a `ToolContext` scoped to its own
//! workspace clone - tools cannot reach outside it.

mod context;
mod executor;
mod traits;

pub mod builtin;

pub use context::ToolContext;
pub use executor::ToolExecutor;
pub use traits::{Tool, ToolResult};
