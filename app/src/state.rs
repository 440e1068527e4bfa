//! Application state management.

use crate::error::CommandError;
use influence_browser::{ChromiumLauncher, SessionLauncher};
use influence_core::AppConfig;
use influence_db::Database;
use influence_scraper::{ScrapeOrchestrator, ScrapeSettings};
use std::sync::Arc;

/// State shared by all commands of one process.
pub struct AppState {
    /// Effective configuration (file, environment and flags applied)
    pub config: AppConfig,
    database: Arc<Database>,
    orchestrator: ScrapeOrchestrator,
}

impl AppState {
    /// Open the document store and prepare a Chromium-backed orchestrator.
    ///
    /// The browser is not launched here; each scrape acquires its own session.
    pub async fn new(config: AppConfig) -> Result<Self, CommandError> {
        let db_path = config.database_path()?;
        tracing::info!("Database: {}", db_path.display());

        let database = Database::new(&db_path).await?;
        database.run_migrations().await?;

        let launcher = Arc::new(ChromiumLauncher::new(config.browser.clone()));
        Ok(Self::with_launcher(config, Arc::new(database), launcher))
    }

    /// Assemble state from an already migrated database and any session launcher.
    pub fn with_launcher(
        config: AppConfig,
        database: Arc<Database>,
        launcher: Arc<dyn SessionLauncher>,
    ) -> Self {
        let orchestrator = ScrapeOrchestrator::new(
            launcher,
            database.clone(),
            ScrapeSettings::from_config(&config),
        );

        Self {
            config,
            database,
            orchestrator,
        }
    }

    /// Scrape pipeline bound to this state's store.
    pub fn orchestrator(&self) -> &ScrapeOrchestrator {
        &self.orchestrator
    }

    /// Document store bound to this state.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Close the database pool.
    pub async fn close(self) {
        let Self { database, .. } = self;
        database.as_ref().clone().close().await;
    }
}
