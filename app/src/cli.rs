use clap::{Parser, Subcommand};
use influence_core::AppConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "influence", version)]
#[command(about = "Scrape public profiles and compute engagement analytics")]
pub struct Cli {
    /// Show the browser window instead of running headless
    #[arg(long, global = true)]
    pub headed: bool,

    /// Document store location (overrides config and INFLUENCE_DATABASE_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Scrape a profile, store it and print the stored record
    Scrape { username: String },
    /// Print the last stored record for a profile
    Fetch { username: String },
    /// List usernames with a stored record
    List,
    /// Remove the stored record for a profile
    Delete { username: String },
}

impl Cli {
    /// Flags win over the config file and the environment.
    pub fn apply(&self, config: &mut AppConfig) {
        if self.headed {
            config.browser.headless = false;
        }
        if let Some(path) = &self.database {
            config.database.path = Some(path.clone());
        }
    }
}
