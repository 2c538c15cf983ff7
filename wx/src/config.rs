//! Configuration for wolfidx

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Checkout of the wolfi-dev/os repository
    #[serde(default = "default_os_dir")]
    pub os_dir: PathBuf,

    /// Path of the JSONL index file
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,
}

fn default_os_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wolfidx")
        .join("os")
}

fn default_index_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wolfidx")
        .join("packages.jsonl")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            os_dir: default_os_dir(),
            index_path: default_index_path(),
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            return Ok(config);
        }

        let default_paths = [
            Some(PathBuf::from("wolfidx.yml")),
            dirs::config_dir().map(|p| p.join("wolfidx").join("config.yml")),
        ];

        for candidate in default_paths.into_iter().flatten() {
            if candidate.exists() {
                let content = std::fs::read_to_string(&candidate)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_are_set() {
        let config = Config::default();
        assert!(config.index_path.ends_with("packages.jsonl"));
        assert!(config.os_dir.ends_with("os"));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.yml");
        std::fs::write(&path, "os_dir: /tmp/os\nindex_path: /tmp/idx.jsonl\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.os_dir, PathBuf::from("/tmp/os"));
        assert_eq!(config.index_path, PathBuf::from("/tmp/idx.jsonl"));
    }
}
