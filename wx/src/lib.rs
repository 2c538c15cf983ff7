//! WolfiIdx - keyword index over the Wolfi package set
//!
//! Builds a line-oriented JSONL index from the YAML build manifests in
//! a wolfi-dev/os checkout, one package record per line, and answers
//! keyword searches by grepping the index file. The index is cheap to
//! rebuild and needs no daemon or database.
//!
//! # Architecture
//!
//! ```text
//! wolfi-index.jsonl
//! {"name":"jq","description":"command-line JSON processor"}
//! {"name":"python-3.12","description":"the Python programming language"}
//! ...
//! ```

pub mod cli;
pub mod config;
mod index;

pub use index::{WolfiError, WolfiIndex, WolfiPackage};

/// Upstream repository holding the package manifests
pub const WOLFI_OS_URL: &str = "https://github.com/wolfi-dev/os";

/// Default cap on search results
pub const DEFAULT_MAX_RESULTS: usize = 50;
