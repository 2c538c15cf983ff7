//! ToolContext - execution context for tools

use std::sync::Arc;

use tracing::debug;
use wolfidx::WolfiIndex;

use crate::sandbox::SandboxEnv;
use crate::workspace::Workspace;

/// Callback for echoing sandbox output lines to the terminal
pub type ScriptEcho = Arc<dyn Fn(&str) + Send + Sync>;

/// Everything a tool needs to run, scoped to one session
#[derive(Clone)]
pub struct ToolContext {
    /// The session's repository clone
    pub workspace: Arc<Workspace>,

    /// Wolfi package index
    pub wolfi: Arc<WolfiIndex>,

    /// Script sandbox
    pub sandbox: Arc<SandboxEnv>,

    /// If set, sandbox output lines are echoed here as they arrive
    script_echo: Option<ScriptEcho>,
}

impl ToolContext {
    pub fn new(workspace: Arc<Workspace>, wolfi: Arc<WolfiIndex>, sandbox: Arc<SandboxEnv>) -> Self {
        debug!("ToolContext::new: called");
        Self {
            workspace,
            wolfi,
            sandbox,
            script_echo: None,
        }
    }

    /// Attach a callback that receives sandbox output lines live
    pub fn with_script_echo(mut self, echo: ScriptEcho) -> Self {
        self.script_echo = Some(echo);
        self
    }

    /// Echo one sandbox output line, if a callback is attached
    pub fn echo_script_line(&self, line: &str) {
        if let Some(echo) = &self.script_echo {
            echo(line);
        }
    }
}
