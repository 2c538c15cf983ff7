//! rq - chat with a GitHub repository
//!
//! CLI entry point: clone the repository, prepare the tool context, and
//! hand control to the interactive session.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info};

use repoqa::cli::Cli;
use repoqa::config::Config;
use repoqa::llm::create_client;
use repoqa::qa::QaEngine;
use repoqa::repl::{ChatSession, display_script_line};
use repoqa::sandbox::SandboxEnv;
use repoqa::tools::ToolContext;
use repoqa::workspace::Workspace;
use wolfidx::WolfiIndex;

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("repoqa")
        .join("logs");
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = match cli_log_level.map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    // Logs go to a file; the terminal belongs to the chat session
    let log_file = fs::File::create(log_dir.join("repoqa.log")).context("Failed to create log file")?;
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join("repoqa")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    debug!(provider = %config.llm.provider, "main: config loaded");

    let agent_client = create_client(&config.llm, &config.llm.agent_model).context("Failed to create agent client")?;
    let fileqa_client =
        create_client(&config.llm, &config.llm.fileqa_model).context("Failed to create file QA client")?;

    let engine = QaEngine::new(fileqa_client, config.llm.max_tokens, 0.0);

    println!("Cloning {} ...", cli.url);
    let workspace = Workspace::clone(&cli.url, engine, config.fileqa.clone())
        .await
        .context("Failed to clone repository")?;

    let index_path = config
        .wolfi
        .index_path
        .clone()
        .unwrap_or_else(|| data_dir().join("wolfi-index.jsonl"));
    let os_dir = config.wolfi.os_dir.clone().unwrap_or_else(|| data_dir().join("wolfi-os"));
    let wolfi = WolfiIndex::load_or_build(&os_dir, &index_path, config.wolfi.rebuild_at_start)
        .await
        .context("Failed to prepare wolfi package index")?;

    let sandbox = SandboxEnv::new(config.sandbox.image.clone());

    let ctx = ToolContext::new(Arc::new(workspace), Arc::new(wolfi), Arc::new(sandbox))
        .with_script_echo(Arc::new(|line| display_script_line(line)));

    let mut session = ChatSession::new(agent_client, ctx, config.llm.max_tokens);
    session.run().await
}
