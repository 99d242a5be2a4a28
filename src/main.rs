use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feedloom::app::AppContext;
use feedloom::cli::{commands, Cli, Commands};
use feedloom::config::Config;
use feedloom::view::TerminalDom;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(secs) = cli.interval {
        config.poller.interval_secs = secs;
    }
    if let Some(language) = cli.language {
        config.locale.language = language;
    }

    let ctx = AppContext::new(config, Arc::new(TerminalDom))?;

    match cli.command {
        Commands::Add { urls } => {
            commands::add_feeds(&ctx, &urls).await;
        }
        Commands::Watch { urls } => {
            commands::watch_feeds(&ctx, &urls).await?;
        }
    }

    Ok(())
}
