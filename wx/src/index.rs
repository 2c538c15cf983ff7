//! Core index implementation

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use grep_regex::RegexMatcherBuilder;
use grep_searcher::sinks::UTF8;
use grep_searcher::{BinaryDetection, SearcherBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{DEFAULT_MAX_RESULTS, WOLFI_OS_URL};

/// Errors from index operations
#[derive(Debug, Error)]
pub enum WolfiError {
    #[error("Index not found: {path}")]
    IndexMissing { path: String },

    #[error("Invalid search keyword: {0}")]
    InvalidKeyword(String),

    #[error("Failed to clone {url}: {stderr}")]
    CloneFailed { url: String, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One package record in the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WolfiPackage {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Shape of a wolfi-dev/os build manifest, reduced to what the index needs
#[derive(Debug, Deserialize)]
struct Manifest {
    package: Option<ManifestPackage>,
}

#[derive(Debug, Deserialize)]
struct ManifestPackage {
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Keyword index over the Wolfi package set
#[derive(Debug)]
pub struct WolfiIndex {
    index_path: PathBuf,
}

impl WolfiIndex {
    /// Open an existing index file
    pub fn open(index_path: impl Into<PathBuf>) -> Result<Self, WolfiError> {
        let index_path = index_path.into();
        debug!(path = %index_path.display(), "WolfiIndex::open: called");
        if !index_path.exists() {
            return Err(WolfiError::IndexMissing {
                path: index_path.display().to_string(),
            });
        }
        Ok(Self { index_path })
    }

    /// Build the index from a wolfi-dev/os checkout
    ///
    /// Walks the checkout for YAML build manifests and writes one JSON
    /// line per package, sorted by name. Files that are not manifests
    /// or carry no package name are skipped.
    pub fn build_from_dir(os_dir: &Path, index_path: impl Into<PathBuf>) -> Result<Self, WolfiError> {
        let index_path = index_path.into();
        info!(os_dir = %os_dir.display(), index = %index_path.display(), "WolfiIndex::build_from_dir: called");

        let mut packages = Vec::new();
        for entry in WalkDir::new(os_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if path.extension().and_then(|x| x.to_str()) != Some("yaml") {
                continue;
            }
            let content = match fs::read_to_string(path) {
                Ok(c) => c,
                Err(e) => {
                    debug!(path = %path.display(), %e, "build_from_dir: unreadable file skipped");
                    continue;
                }
            };
            let manifest: Manifest = match serde_yaml::from_str(&content) {
                Ok(m) => m,
                Err(e) => {
                    debug!(path = %path.display(), %e, "build_from_dir: not a manifest, skipped");
                    continue;
                }
            };
            let Some(pkg) = manifest.package else { continue };
            let Some(name) = pkg.name else { continue };
            packages.push(WolfiPackage {
                name,
                description: pkg.description.unwrap_or_default(),
            });
        }

        packages.sort_by(|a, b| a.name.cmp(&b.name));

        if let Some(parent) = index_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(&index_path)?;
        for pkg in &packages {
            let line = serde_json::to_string(pkg)?;
            writeln!(file, "{}", line)?;
        }

        info!(package_count = packages.len(), "WolfiIndex::build_from_dir: index written");
        Ok(Self { index_path })
    }

    /// Open the index, building it first when absent or forced
    ///
    /// Clones the upstream manifests repository if `os_dir` does not
    /// exist yet.
    pub async fn load_or_build(os_dir: &Path, index_path: &Path, rebuild: bool) -> Result<Self, WolfiError> {
        debug!(rebuild, "WolfiIndex::load_or_build: called");
        if index_path.exists() && !rebuild {
            return Self::open(index_path);
        }
        ensure_os_checkout(os_dir).await?;
        Self::build_from_dir(os_dir, index_path)
    }

    /// Path of the underlying index file
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Number of packages in the index
    pub fn package_count(&self) -> Result<usize, WolfiError> {
        let content = fs::read_to_string(&self.index_path)?;
        Ok(content.lines().filter(|l| !l.trim().is_empty()).count())
    }

    /// Case-insensitive keyword search over names and descriptions
    pub fn search(&self, keyword: &str) -> Result<Vec<WolfiPackage>, WolfiError> {
        debug!(%keyword, "WolfiIndex::search: called");
        if keyword.trim().is_empty() {
            return Err(WolfiError::InvalidKeyword("keyword must not be empty".to_string()));
        }

        // Literal match; the keyword is user input, not a regex
        let matcher = RegexMatcherBuilder::new()
            .case_insensitive(true)
            .build(&regex::escape(keyword))
            .map_err(|e| WolfiError::InvalidKeyword(e.to_string()))?;

        let mut searcher = SearcherBuilder::new()
            .binary_detection(BinaryDetection::quit(b'\x00'))
            .build();

        let mut packages = Vec::new();
        searcher.search_path(
            &matcher,
            &self.index_path,
            UTF8(|_line_num, line| {
                if packages.len() >= DEFAULT_MAX_RESULTS {
                    return Ok(false);
                }
                if let Ok(pkg) = serde_json::from_str::<WolfiPackage>(line) {
                    packages.push(pkg);
                }
                Ok(true)
            }),
        )?;

        debug!(matches = packages.len(), "WolfiIndex::search: done");
        Ok(packages)
    }
}

/// Clone the manifests repository if the checkout is missing
async fn ensure_os_checkout(os_dir: &Path) -> Result<(), WolfiError> {
    if os_dir.exists() {
        debug!(os_dir = %os_dir.display(), "ensure_os_checkout: checkout present");
        return Ok(());
    }
    info!(os_dir = %os_dir.display(), "ensure_os_checkout: cloning manifests repository");
    if let Some(parent) = os_dir.parent() {
        fs::create_dir_all(parent)?;
    }
    let output = tokio::process::Command::new("git")
        .args(["clone", "--depth", "1", WOLFI_OS_URL])
        .arg(os_dir)
        .output()
        .await?;
    if !output.status.success() {
        return Err(WolfiError::CloneFailed {
            url: WOLFI_OS_URL.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_manifest(dir: &Path, file: &str, name: &str, description: &str) {
        let yaml = format!(
            "package:\n  name: {}\n  version: 1.0.0\n  description: {}\npipeline:\n  - uses: autoconf/make\n",
            name, description
        );
        fs::write(dir.join(file), yaml).unwrap();
    }

    fn build_test_index(os: &tempfile::TempDir, idx: &tempfile::TempDir) -> WolfiIndex {
        WolfiIndex::build_from_dir(os.path(), idx.path().join("packages.jsonl")).unwrap()
    }

    #[test]
    fn test_open_missing_index_fails() {
        let err = WolfiIndex::open("/nonexistent/packages.jsonl").unwrap_err();
        assert!(matches!(err, WolfiError::IndexMissing { .. }));
    }

    #[test]
    fn test_build_collects_manifests() {
        let os = tempdir().unwrap();
        let idx = tempdir().unwrap();
        write_manifest(os.path(), "jq.yaml", "jq", "command-line JSON processor");
        write_manifest(os.path(), "curl.yaml", "curl", "URL retrieval utility");
        // not a manifest, must be skipped
        fs::write(os.path().join("README.md"), "# hello").unwrap();
        fs::write(os.path().join("broken.yaml"), ": : :").unwrap();

        let index = build_test_index(&os, &idx);
        assert_eq!(index.package_count().unwrap(), 2);
    }

    #[test]
    fn test_manifest_without_description() {
        let os = tempdir().unwrap();
        let idx = tempdir().unwrap();
        fs::write(os.path().join("bare.yaml"), "package:\n  name: bare\n").unwrap();

        let index = build_test_index(&os, &idx);
        let results = index.search("bare").unwrap();
        assert_eq!(results, vec![WolfiPackage {
            name: "bare".to_string(),
            description: String::new(),
        }]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let os = tempdir().unwrap();
        let idx = tempdir().unwrap();
        write_manifest(os.path(), "py.yaml", "python-3.12", "the Python programming language");
        write_manifest(os.path(), "jq.yaml", "jq", "command-line JSON processor");

        let index = build_test_index(&os, &idx);
        let results = index.search("PYTHON").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "python-3.12");
    }

    #[test]
    fn test_search_matches_description() {
        let os = tempdir().unwrap();
        let idx = tempdir().unwrap();
        write_manifest(os.path(), "jq.yaml", "jq", "command-line JSON processor");

        let index = build_test_index(&os, &idx);
        let results = index.search("JSON").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "jq");
    }

    #[test]
    fn test_search_treats_keyword_as_literal() {
        let os = tempdir().unwrap();
        let idx = tempdir().unwrap();
        write_manifest(os.path(), "a.yaml", "g++-wrapper", "c++ compiler wrapper");
        write_manifest(os.path(), "b.yaml", "gcc", "c compiler");

        let index = build_test_index(&os, &idx);
        // "g++" is not a valid regex but is a valid literal keyword
        let results = index.search("g++").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "g++-wrapper");
    }

    #[test]
    fn test_empty_keyword_rejected() {
        let os = tempdir().unwrap();
        let idx = tempdir().unwrap();
        write_manifest(os.path(), "jq.yaml", "jq", "command-line JSON processor");

        let index = build_test_index(&os, &idx);
        assert!(matches!(index.search("  "), Err(WolfiError::InvalidKeyword(_))));
    }

    #[tokio::test]
    async fn test_load_or_build_reuses_existing_index() {
        let os = tempdir().unwrap();
        let idx = tempdir().unwrap();
        write_manifest(os.path(), "jq.yaml", "jq", "command-line JSON processor");
        let index_path = idx.path().join("packages.jsonl");
        WolfiIndex::build_from_dir(os.path(), &index_path).unwrap();

        // os_dir contents change, but without rebuild the old index stands
        write_manifest(os.path(), "new.yaml", "newpkg", "newly added");
        let index = WolfiIndex::load_or_build(os.path(), &index_path, false).await.unwrap();
        assert_eq!(index.package_count().unwrap(), 1);

        let index = WolfiIndex::load_or_build(os.path(), &index_path, true).await.unwrap();
        assert_eq!(index.package_count().unwrap(), 2);
    }
}
