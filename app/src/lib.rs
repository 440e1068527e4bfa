//! Influence command line application
//!
//! Thin shell that loads configuration, opens the document store and
//! dispatches commands. Scraping logic lives in the `crates/` directory.

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use cli::{Cli, Command};
use error::CommandError;
use influence_core::AppConfig;
use state::AppState;
use tracing::info;

/// Initialize tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,influence=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Run one command and return the JSON to print.
pub async fn run(cli: Cli) -> Result<String, CommandError> {
    info!("Starting Influence v{}", env!("CARGO_PKG_VERSION"));

    let mut config = AppConfig::load_with_env()?;
    cli.apply(&mut config);

    let state = AppState::new(config).await?;
    let output = dispatch(&state, &cli.command).await;
    state.close().await;

    output
}

/// Execute a command against prepared state.
pub async fn dispatch(state: &AppState, command: &Command) -> Result<String, CommandError> {
    use commands::influencer;

    let output = match command {
        Command::Scrape { username } => {
            serde_json::to_value(influencer::scrape_influencer(state, username).await?)?
        }
        Command::Fetch { username } => {
            serde_json::to_value(influencer::fetch_influencer(state, username).await?)?
        }
        Command::List => serde_json::to_value(influencer::list_influencers(state).await?)?,
        Command::Delete { username } => {
            let deleted = influencer::delete_influencer(state, username).await?;
            serde_json::json!({ "deleted": deleted })
        }
    };

    Ok(serde_json::to_string_pretty(&output)?)
}
