//! Tutora - interactive AI tutoring chat CLI
//!
//! Main entry point for the Tutora application.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tutora::cli::{Cli, Commands};
use tutora::commands;
use tutora::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load and validate configuration
    let config = Config::load(&cli.config)?;
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat {
            provider,
            window_pairs,
            prompt_file,
        } => {
            if let Some(p) = &provider {
                tracing::debug!("Using provider override: {}", p);
            }
            if let Some(k) = window_pairs {
                tracing::debug!("Using window capacity override: {} pairs", k);
            }

            commands::chat::run_chat(config, provider, window_pairs, prompt_file).await?;
            Ok(())
        }
        Commands::Extract { file } => {
            commands::extract::run_extract(&file)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "tutora=debug" } else { "tutora=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
