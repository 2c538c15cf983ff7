use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::info;

use wolfidx::WolfiIndex;
use wolfidx::cli::{Cli, Command};
use wolfidx::config::Config;

fn setup_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    info!("wolfidx starting");

    match cli.command {
        Command::Build { os_dir } => {
            let os_dir = os_dir.unwrap_or(config.os_dir);
            let index = WolfiIndex::load_or_build(&os_dir, &config.index_path, true)
                .await
                .context("Failed to build index")?;
            println!(
                "{} Indexed {} packages to {}",
                "✓".green(),
                index.package_count()?,
                index.index_path().display()
            );
        }
        Command::Search { keyword } => {
            let index = WolfiIndex::open(&config.index_path).context("Index missing; run `wx build` first")?;
            let results = index.search(&keyword)?;
            if results.is_empty() {
                println!("No packages matched '{}'", keyword);
            } else {
                for pkg in results {
                    println!("{}: {}", pkg.name.cyan(), pkg.description);
                }
            }
        }
        Command::Stats => {
            let index = WolfiIndex::open(&config.index_path).context("Index missing; run `wx build` first")?;
            println!("{} packages in {}", index.package_count()?, index.index_path().display());
        }
    }

    Ok(())
}
