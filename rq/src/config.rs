//! Configuration loading and validation
//!
//! Config is YAML with kebab-case keys, loaded from the first of:
//! `./.repoqa.yml`, `~/.config/repoqa/repoqa.yml`, built-in defaults.
//! Every section is optional; missing keys fall back to defaults so a
//! partial file only overrides what it names.

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub fileqa: FileQaConfig,

    #[serde(default)]
    pub sandbox: SandboxConfig,

    #[serde(default)]
    pub wolfi: WolfiConfig,
}

/// LLM transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LlmConfig {
    /// Provider name: "anthropic" or "openai"
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model driving the conversation loop
    #[serde(default = "default_agent_model")]
    pub agent_model: String,

    /// Model used for file QA runs
    #[serde(default = "default_fileqa_model")]
    pub fileqa_model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Override the provider base URL (for proxies and tests)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Max tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            agent_model: default_agent_model(),
            fileqa_model: default_fileqa_model(),
            api_key_env: default_api_key_env(),
            base_url: None,
            max_tokens: default_max_tokens(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        debug!(env = %self.api_key_env, "LlmConfig::get_api_key: called");
        std::env::var(&self.api_key_env)
            .wrap_err_with(|| format!("environment variable {} is not set", self.api_key_env))
    }
}

/// File QA sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FileQaConfig {
    /// Max characters read from a file before truncation
    #[serde(default = "default_max_file_chars")]
    pub max_file_chars: usize,

    /// Chunk window size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between adjacent chunks in characters
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

impl Default for FileQaConfig {
    fn default() -> Self {
        Self {
            max_file_chars: default_max_file_chars(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

/// Script sandbox configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SandboxConfig {
    /// Container image scripts run in
    #[serde(default = "default_sandbox_image")]
    pub image: String,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            image: default_sandbox_image(),
        }
    }
}

/// Wolfi package index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WolfiConfig {
    /// Checkout of the wolfi-dev/os repository; cloned if absent
    #[serde(default)]
    pub os_dir: Option<PathBuf>,

    /// Where the package index file lives; defaults under the data dir
    #[serde(default)]
    pub index_path: Option<PathBuf>,

    /// Rebuild the index at startup even if one exists
    #[serde(default)]
    pub rebuild_at_start: bool,
}

impl Default for WolfiConfig {
    fn default() -> Self {
        Self {
            os_dir: None,
            index_path: None,
            rebuild_at_start: false,
        }
    }
}

fn default_provider() -> String {
    "anthropic".to_string()
}

fn default_agent_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_fileqa_model() -> String {
    "claude-3-5-haiku-20241022".to_string()
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_timeout_ms() -> u64 {
    120_000
}

fn default_max_file_chars() -> usize {
    200_000
}

fn default_chunk_size() -> usize {
    10_000
}

fn default_chunk_overlap() -> usize {
    500
}

fn default_sandbox_image() -> String {
    "cgr.dev/chainguard/wolfi-base:latest".to_string()
}

impl Config {
    /// Load from an explicit path, or walk the fallback chain
    pub fn load(path: Option<&Path>) -> Result<Self> {
        debug!(?path, "Config::load: called");
        if let Some(path) = path {
            let content =
                std::fs::read_to_string(path).wrap_err_with(|| format!("failed to read config: {}", path.display()))?;
            let config: Config = serde_yaml::from_str(&content)
                .wrap_err_with(|| format!("failed to parse config: {}", path.display()))?;
            config.validate()?;
            return Ok(config);
        }

        for candidate in Self::default_paths() {
            if candidate.exists() {
                debug!(path = %candidate.display(), "Config::load: using config file");
                let content = std::fs::read_to_string(&candidate)
                    .wrap_err_with(|| format!("failed to read config: {}", candidate.display()))?;
                let config: Config = serde_yaml::from_str(&content)
                    .wrap_err_with(|| format!("failed to parse config: {}", candidate.display()))?;
                config.validate()?;
                return Ok(config);
            }
        }

        debug!("Config::load: no config file found, using defaults");
        let config = Config::default();
        config.validate()?;
        Ok(config)
    }

    /// Candidate config locations, nearest first
    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".repoqa.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("repoqa").join("repoqa.yml"));
        }
        paths
    }

    /// Reject configs the QA pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        debug!("Config::validate: called");
        if self.llm.provider != "anthropic" && self.llm.provider != "openai" {
            eyre::bail!("unknown llm provider: {} (expected anthropic or openai)", self.llm.provider);
        }
        if self.fileqa.chunk_size == 0 {
            eyre::bail!("fileqa chunk-size must be greater than zero");
        }
        if self.fileqa.chunk_overlap >= self.fileqa.chunk_size {
            eyre::bail!(
                "fileqa chunk-overlap ({}) must be smaller than chunk-size ({})",
                self.fileqa.chunk_overlap,
                self.fileqa.chunk_size
            );
        }
        if self.fileqa.max_file_chars < self.fileqa.chunk_size {
            eyre::bail!(
                "fileqa max-file-chars ({}) must be at least chunk-size ({})",
                self.fileqa.max_file_chars,
                self.fileqa.chunk_size
            );
        }
        Ok(())
    }
}
