//! Interactive chat over a cloned repository

mod display;
mod session;

pub use display::{ToolInvocation, display_script_line};
pub use session::ChatSession;
