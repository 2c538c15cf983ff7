//! repoqa - conversational question answering over GitHub repositories
//!
//! The crate clones a repository, indexes the Wolfi package set, and
//! runs an interactive chat session whose model answers through tools:
//! per-file QA (direct or incremental for large files), glob path
//! search, sandboxed script execution, and package lookup.
//!
//! # Modules
//!
//! - [`qa`] - the file question-answering core (chunking, prompts, engine)
//! - [`workspace`] - per-session repository clone and file access
//! - [`llm`] - provider-neutral model transport (Anthropic, OpenAI)
//! - [`tools`] - the agent's tool system
//! - [`sandbox`] - containerized script execution
//! - [`repl`] - the interactive chat loop
//! - [`config`] - YAML configuration with fallback chain

pub mod cli;
pub mod config;
pub mod llm;
pub mod qa;
pub mod repl;
pub mod sandbox;
pub mod tools;
pub mod workspace;
