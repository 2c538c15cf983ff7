//! Script sandbox - containerized shell execution
//!
//! Scripts run inside a throwaway Wolfi container via `docker run
//! --rm`. Requested packages are installed with apk before the script
//! body runs, and combined stdout/stderr is streamed line by line so
//! the user sees progress on long installs. A nonzero exit status is an
//! outcome, not an error; the transcript goes back to the model either
//! way.

use std::process::Stdio;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Errors from sandbox execution
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("Failed to run container: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result of one sandboxed script run
#[derive(Debug, Clone)]
pub struct SandboxOutcome {
    /// Combined stdout and stderr in arrival order
    pub transcript: String,

    /// Process exit code; None if killed by a signal
    pub exit_code: Option<i32>,
}

impl SandboxOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs shell scripts inside a fresh container per call
pub struct SandboxEnv {
    image: String,
}

impl SandboxEnv {
    pub fn new(image: impl Into<String>) -> Self {
        Self { image: image.into() }
    }

    /// Container image used for runs
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Run a shell script, installing `deps` with apk first
    ///
    /// `on_line` is invoked for every output line as it arrives. The
    /// full transcript and exit code come back in the outcome.
    pub async fn run_script(
        &self,
        script: &str,
        deps: &[String],
        on_line: impl Fn(&str),
    ) -> Result<SandboxOutcome, SandboxError> {
        debug!(deps = deps.len(), "SandboxEnv::run_script: called");
        if script.trim().is_empty() {
            return Err(SandboxError::InvalidArgument("script must not be empty".to_string()));
        }

        let command = if deps.is_empty() {
            script.to_string()
        } else {
            format!("apk add -q {} && {}", deps.join(" "), script)
        };

        let mut child = Command::new("docker")
            .args(["run", "--rm", &self.image, "sh", "-c", &command])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Merge the two pipes into one ordered line stream
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        if let Some(stdout) = child.stdout.take() {
            let tx = tx.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            });
        }
        if let Some(stderr) = child.stderr.take() {
            let tx = tx.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        let mut transcript = String::new();
        while let Some(line) = rx.recv().await {
            on_line(&line);
            transcript.push_str(&line);
            transcript.push('\n');
        }

        let status = child.wait().await?;
        info!(exit_code = ?status.code(), "SandboxEnv::run_script: container exited");
        Ok(SandboxOutcome {
            transcript,
            exit_code: status.code(),
        })
    }
}
