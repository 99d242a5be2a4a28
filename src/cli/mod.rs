pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::interval::parse_interval;

#[derive(Parser)]
#[command(name = "feedloom")]
#[command(about = "An RSS aggregator that polls feeds for new posts", long_about = None)]
pub struct Cli {
    /// Path to the config file (default: ~/.config/feedloom/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Poll interval, overriding the config file (e.g., "5s", "1m", "1h")
    #[arg(short, long, global = true, value_parser = parse_interval)]
    pub interval: Option<u64>,

    /// Interface language ("ru" or "en"), overriding the config file
    #[arg(short, long, global = true)]
    pub language: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Subscribe to feeds and print what was loaded
    Add {
        /// URLs of the feeds to add
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Subscribe to feeds, then keep polling them until interrupted
    Watch {
        /// URLs of the feeds to add
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_watch_with_interval() {
        let cli = Cli::try_parse_from([
            "feedloom",
            "watch",
            "https://example.com/rss",
            "--interval",
            "30s",
        ])
        .unwrap();

        assert_eq!(cli.interval, Some(30));
        match cli.command {
            Commands::Watch { urls } => assert_eq!(urls, vec!["https://example.com/rss"]),
            _ => panic!("expected watch"),
        }
    }

    #[test]
    fn test_add_requires_url() {
        assert!(Cli::try_parse_from(["feedloom", "add"]).is_err());
    }

    #[test]
    fn test_bad_interval_rejected() {
        assert!(Cli::try_parse_from([
            "feedloom",
            "--interval",
            "sometimes",
            "add",
            "https://example.com/rss"
        ])
        .is_err());
    }
}
