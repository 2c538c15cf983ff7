//! CLI argument parsing for wolfidx

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wx")]
#[command(author, version, about = "Keyword index over the Wolfi package set", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build (or rebuild) the index from a wolfi-dev/os checkout
    Build {
        /// Checkout directory; cloned if missing
        #[arg(short, long)]
        os_dir: Option<PathBuf>,
    },

    /// Search the index by keyword
    Search {
        /// Keyword to match against names and descriptions
        #[arg(required = true)]
        keyword: String,
    },

    /// Show index statistics
    Stats,
}
