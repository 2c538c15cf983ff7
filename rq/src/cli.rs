//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

/// repoqa - chat with a GitHub repository
#[derive(Debug, Parser)]
#[command(name = "rq", about = "Clone a GitHub repository and answer questions about it", version)]
pub struct Cli {
    /// Repository URL to clone and chat about
    #[arg(value_name = "URL")]
    pub url: String,

    /// Path to config file
    #[arg(short, long, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)")]
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_url_positional() {
        let cli = Cli::parse_from(["rq", "https://github.com/wolfi-dev/os"]);
        assert_eq!(cli.url, "https://github.com/wolfi-dev/os");
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parses_flags() {
        let cli = Cli::parse_from(["rq", "-c", "my.yml", "-l", "debug", "https://example.com/repo.git"]);
        assert_eq!(cli.config, Some(PathBuf::from("my.yml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_url_is_required() {
        assert!(Cli::try_parse_from(["rq"]).is_err());
    }
}
