//! Repository workspace - a per-session clone of the target repo
//!
//! Each session clones the repository into a unique scratch directory
//! under the system temp dir and scopes every file operation to the
//! cloned tree. The workspace owns the file-QA dispatch: it reads a
//! bounded amount of a file and routes to the direct or incremental QA
//! path based on the chunk threshold.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::FileQaConfig;
use crate::qa::{QaEngine, QaError, QaResponse};

/// Cap on glob search results returned to the agent
const MAX_SEARCH_RESULTS: usize = 500;

/// Errors from workspace operations
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to clone {url}: {stderr}")]
    CloneFailed { url: String, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Qa(#[from] QaError),
}

/// Derive the repository name from its URL
fn repo_name(url: &str) -> String {
    let base = url.trim_end_matches('/').rsplit('/').next().unwrap_or(url);
    base.strip_suffix(".git").unwrap_or(base).to_string()
}

/// Reject absolute paths and parent-directory traversal
///
/// Paths arrive from the model, so they are untrusted input.
fn validate_rel_path(path: &str) -> Result<(), WorkspaceError> {
    let p = Path::new(path);
    if p.is_absolute() {
        return Err(WorkspaceError::InvalidArgument(format!(
            "path must be relative to the repository root: {}",
            path
        )));
    }
    if p.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(WorkspaceError::InvalidArgument(format!(
            "path must not contain '..': {}",
            path
        )));
    }
    Ok(())
}

/// A cloned repository bound to a QA engine
pub struct Workspace {
    url: String,
    repo_dir: PathBuf,
    engine: QaEngine,
    fileqa: FileQaConfig,
    /// Scratch dir holding the clone; removed on drop when owned
    scratch: Option<PathBuf>,
}

impl Workspace {
    /// Clone `url` into a fresh scratch directory
    pub async fn clone(url: &str, engine: QaEngine, fileqa: FileQaConfig) -> Result<Self, WorkspaceError> {
        debug!(%url, "Workspace::clone: called");
        let scratch = std::env::temp_dir().join(format!("repoqa-{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&scratch).await?;

        let repo_dir = scratch.join(repo_name(url));
        let output = Command::new("git")
            .args(["clone", "--depth", "1", url])
            .arg(&repo_dir)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            debug!(%url, "Workspace::clone: git clone failed");
            let _ = tokio::fs::remove_dir_all(&scratch).await;
            return Err(WorkspaceError::CloneFailed {
                url: url.to_string(),
                stderr,
            });
        }

        info!(%url, repo_dir = %repo_dir.display(), "Cloned repository into workspace");
        Ok(Self {
            url: url.to_string(),
            repo_dir,
            engine,
            fileqa,
            scratch: Some(scratch),
        })
    }

    /// Bind to an already-checked-out tree (not removed on drop)
    pub fn open(repo_dir: impl Into<PathBuf>, engine: QaEngine, fileqa: FileQaConfig) -> Self {
        let repo_dir = repo_dir.into();
        debug!(repo_dir = %repo_dir.display(), "Workspace::open: called");
        Self {
            url: String::new(),
            repo_dir,
            engine,
            fileqa,
            scratch: None,
        }
    }

    /// Repository URL this workspace was cloned from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Root of the cloned tree
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// Read at most `n` characters of a file, reporting truncation
    ///
    /// The path is relative to the repository root. Returns the text and
    /// whether the file held more than `n` characters.
    pub async fn read_up_to(&self, n: usize, file_path: &str) -> Result<(String, bool), WorkspaceError> {
        debug!(n, %file_path, "Workspace::read_up_to: called");
        validate_rel_path(file_path)?;

        let full_path = self.repo_dir.join(file_path);
        let content = match tokio::fs::read_to_string(&full_path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(%file_path, "Workspace::read_up_to: file not found");
                return Err(WorkspaceError::NotFound {
                    path: file_path.to_string(),
                });
            }
            Err(e) => return Err(WorkspaceError::Io(e)),
        };

        let total_chars = content.chars().count();
        if total_chars > n {
            debug!(total_chars, cap = n, "Workspace::read_up_to: truncating");
            Ok((content.chars().take(n).collect(), true))
        } else {
            Ok((content, false))
        }
    }

    /// Answer a question about one file with the QA engine
    ///
    /// Files longer than the configured chunk size go through the
    /// incremental summary path; everything else is answered in a single
    /// call. Files beyond `max_file_chars` are truncated and the result
    /// is flagged as such.
    pub async fn fileqa(&self, question: &str, file_path: &str) -> Result<QaResponse, WorkspaceError> {
        debug!(%question, %file_path, "Workspace::fileqa: called");
        if question.trim().is_empty() {
            return Err(WorkspaceError::InvalidArgument("question must not be empty".to_string()));
        }
        if file_path.trim().is_empty() {
            return Err(WorkspaceError::InvalidArgument("file_path must not be empty".to_string()));
        }

        let (text, truncated) = self.read_up_to(self.fileqa.max_file_chars, file_path).await?;
        if truncated {
            warn!(%file_path, cap = self.fileqa.max_file_chars, "fileqa: file truncated before analysis");
        }

        let mut response = if text.chars().count() > self.fileqa.chunk_size {
            debug!(%file_path, "Workspace::fileqa: routing to incremental summary path");
            self.engine
                .answer_map_reduce(
                    question,
                    &text,
                    file_path,
                    self.fileqa.chunk_size,
                    self.fileqa.chunk_overlap,
                )
                .await?
        } else {
            debug!(%file_path, "Workspace::fileqa: routing to direct path");
            self.engine.answer_direct(question, &text, file_path).await?
        };

        response.truncated = truncated;
        Ok(response)
    }

    /// Search the repository for paths matching a glob pattern
    ///
    /// Returns (directories, files), both relative to the repository
    /// root, capped at [`MAX_SEARCH_RESULTS`] entries total.
    pub fn search(&self, pattern: &str) -> Result<(Vec<String>, Vec<String>), WorkspaceError> {
        debug!(%pattern, "Workspace::search: called");
        validate_rel_path(pattern)?;

        let full_pattern = self.repo_dir.join(pattern);
        let pattern_str = full_pattern
            .to_str()
            .ok_or_else(|| WorkspaceError::InvalidArgument(format!("pattern is not valid UTF-8: {}", pattern)))?;

        let paths = glob::glob(pattern_str)
            .map_err(|e| WorkspaceError::InvalidArgument(format!("invalid glob pattern: {}", e)))?;

        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for path in paths.filter_map(|r| r.ok()).take(MAX_SEARCH_RESULTS) {
            let rel = match path.strip_prefix(&self.repo_dir) {
                Ok(r) => r.to_string_lossy().to_string(),
                Err(_) => continue,
            };
            if path.is_dir() {
                dirs.push(rel);
            } else {
                files.push(rel);
            }
        }

        debug!(dirs = dirs.len(), files = files.len(), "Workspace::search: matches found");
        Ok((dirs, files))
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if let Some(scratch) = &self.scratch {
            let _ = std::fs::remove_dir_all(scratch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::fs;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tempfile::tempdir;

    use crate::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, StopReason, TokenUsage};

    struct CountingClient {
        replies: Mutex<VecDeque<String>>,
        calls: Mutex<usize>,
    }

    impl CountingClient {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(VecDeque::new()),
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl LlmClient for CountingClient {
        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            *self.calls.lock().unwrap() += 1;
            let content = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| "scripted reply".to_string());
            Ok(CompletionResponse {
                content: Some(content),
                tool_calls: vec![],
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage {
                    input_tokens: 10,
                    output_tokens: 5,
                },
            })
        }

        fn model(&self) -> &str {
            "counting-model"
        }
    }

    fn test_config() -> FileQaConfig {
        FileQaConfig {
            max_file_chars: 100_000,
            chunk_size: 10_000,
            chunk_overlap: 500,
        }
    }

    fn workspace_over(dir: &Path, client: Arc<CountingClient>, cfg: FileQaConfig) -> Workspace {
        let engine = QaEngine::new(client, 4096, 0.0);
        Workspace::open(dir, engine, cfg)
    }

    #[test]
    fn test_repo_name() {
        assert_eq!(repo_name("https://github.com/wolfi-dev/os.git"), "os");
        assert_eq!(repo_name("https://github.com/wolfi-dev/os"), "os");
        assert_eq!(repo_name("https://github.com/wolfi-dev/os/"), "os");
    }

    #[test]
    fn test_validate_rel_path() {
        assert!(validate_rel_path("src/lib.rs").is_ok());
        assert!(validate_rel_path("README.md").is_ok());
        assert!(validate_rel_path("/etc/passwd").is_err());
        assert!(validate_rel_path("../outside").is_err());
        assert!(validate_rel_path("src/../../outside").is_err());
    }

    #[tokio::test]
    async fn test_read_up_to_truncation() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("big.txt"), "a".repeat(50)).unwrap();

        let ws = workspace_over(temp.path(), CountingClient::new(), test_config());

        let (text, truncated) = ws.read_up_to(20, "big.txt").await.unwrap();
        assert_eq!(text.len(), 20);
        assert!(truncated);

        let (text, truncated) = ws.read_up_to(50, "big.txt").await.unwrap();
        assert_eq!(text.len(), 50);
        assert!(!truncated);
    }

    #[tokio::test]
    async fn test_read_missing_file_is_not_found() {
        let temp = tempdir().unwrap();
        let ws = workspace_over(temp.path(), CountingClient::new(), test_config());

        let err = ws.read_up_to(100, "does-not-exist.txt").await.unwrap_err();
        assert!(matches!(err, WorkspaceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_fileqa_small_file_uses_direct_path() {
        // 100 chars with chunk_size 10000 -> a single transport call
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("small.txt"), "a".repeat(100)).unwrap();

        let client = CountingClient::new();
        let ws = workspace_over(temp.path(), client.clone(), test_config());

        let resp = ws.fileqa("what is in this file?", "small.txt").await.unwrap();
        assert_eq!(client.calls(), 1);
        assert!(!resp.truncated);
    }

    #[tokio::test]
    async fn test_fileqa_large_file_uses_incremental_path() {
        // 25k chars, chunk_size 10000, overlap 500 -> chunks + 1 calls
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("large.txt"), "a".repeat(25_000)).unwrap();

        let client = CountingClient::new();
        let ws = workspace_over(temp.path(), client.clone(), test_config());

        ws.fileqa("what is in this file?", "large.txt").await.unwrap();

        let chunks = crate::qa::split_text(&"a".repeat(25_000), 10_000, 500).unwrap();
        assert!(chunks.len() >= 3);
        assert_eq!(client.calls(), chunks.len() + 1);
    }

    #[tokio::test]
    async fn test_fileqa_threshold_boundary_goes_direct() {
        // Length exactly chunk_size must stay on the direct path
        let cfg = FileQaConfig {
            max_file_chars: 100_000,
            chunk_size: 200,
            chunk_overlap: 20,
        };
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("edge.txt"), "b".repeat(200)).unwrap();

        let client = CountingClient::new();
        let ws = workspace_over(temp.path(), client.clone(), cfg);

        ws.fileqa("q", "edge.txt").await.unwrap();
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_fileqa_truncated_flag_set() {
        let cfg = FileQaConfig {
            max_file_chars: 50,
            chunk_size: 10_000,
            chunk_overlap: 500,
        };
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("huge.txt"), "c".repeat(500)).unwrap();

        let ws = workspace_over(temp.path(), CountingClient::new(), cfg);

        let resp = ws.fileqa("q", "huge.txt").await.unwrap();
        assert!(resp.truncated);
    }

    #[tokio::test]
    async fn test_fileqa_empty_question_rejected() {
        let temp = tempdir().unwrap();
        let ws = workspace_over(temp.path(), CountingClient::new(), test_config());

        let err = ws.fileqa("  ", "file.txt").await.unwrap_err();
        assert!(matches!(err, WorkspaceError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_search_partitions_dirs_and_files() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/lib.rs"), "").unwrap();
        fs::write(temp.path().join("README.md"), "").unwrap();

        let ws = workspace_over(temp.path(), CountingClient::new(), test_config());

        let (dirs, files) = ws.search("*").unwrap();
        assert!(dirs.contains(&"src".to_string()));
        assert!(files.contains(&"README.md".to_string()));

        let (_, files) = ws.search("src/*.rs").unwrap();
        assert_eq!(files, vec!["src/lib.rs".to_string()]);
    }

    #[tokio::test]
    async fn test_search_rejects_traversal() {
        let temp = tempdir().unwrap();
        let ws = workspace_over(temp.path(), CountingClient::new(), test_config());

        assert!(ws.search("../*").is_err());
        assert!(ws.search("/etc/*").is_err());
    }
}
