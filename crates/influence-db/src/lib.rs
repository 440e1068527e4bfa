//! Influence Database Layer
//!
//! Provides the `SQLite` document store that keeps the latest scrape for
//! each account. Uses `SQLx` with embedded migrations.
//!
//! # Example
//!
//! ```ignore
//! use influence_db::{influencers, Database};
//!
//! let db = Database::new("influence.db").await?;
//! db.run_migrations().await?;
//! let record = influencers::upsert_influencer(db.pool(), &scrape_result).await?;
//! ```
//!
//! # Design Principles
//!
//! - One row per lowercased username; writes replace the whole document
//! - Posts are stored as an ordered JSON array
//! - Migrations are idempotent and safe to run on every startup

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod connection;
pub mod error;
pub mod influencers;
pub mod migrations;

// Re-export commonly used types
pub use connection::ConnectionPool;
pub use error::{DatabaseError, Result};

use influence_core::{InfluencerRecord, ScrapeResult, Username};
use std::path::Path;

/// High-level database interface.
///
/// Wraps a `ConnectionPool` and exposes migrations and the influencer
/// document operations.
#[derive(Debug, Clone)]
pub struct Database {
    pool: ConnectionPool,
}

impl Database {
    /// Open (or create) the database at `path`.
    ///
    /// # Arguments
    /// * `path` - Path to the database file (or `:memory:` for in-memory)
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let pool = ConnectionPool::new(path).await?;
        Ok(Self { pool })
    }

    /// Run all pending database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        migrations::run_migrations(self.pool.pool()).await
    }

    /// Get the current schema version.
    pub async fn get_schema_version(&self) -> Result<i64> {
        migrations::get_schema_version(self.pool.pool()).await
    }

    /// Get a reference to the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Sqlite> {
        self.pool.pool()
    }

    /// Replace or create the record for the scraped username.
    pub async fn upsert_influencer(&self, result: &ScrapeResult) -> Result<InfluencerRecord> {
        influencers::upsert_influencer(self.pool.pool(), result).await
    }

    /// Get the stored record for a username.
    pub async fn get_influencer(&self, username: &Username) -> Result<Option<InfluencerRecord>> {
        influencers::get_influencer(self.pool.pool(), username).await
    }

    /// Delete the stored record for a username.
    pub async fn delete_influencer(&self, username: &Username) -> Result<()> {
        influencers::delete_influencer(self.pool.pool(), username).await
    }

    /// Stored usernames, most recently updated first.
    pub async fn list_usernames(&self) -> Result<Vec<String>> {
        influencers::list_usernames(self.pool.pool()).await
    }

    /// Close the database connection gracefully.
    pub async fn close(self) {
        self.pool.close().await;
    }
}
