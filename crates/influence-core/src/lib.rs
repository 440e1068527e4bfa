//! Influence Core - Foundation crate for the Influence profile scraper.
//!
//! This crate provides the data model, error handling and configuration
//! management that the browser, scraper, database and app crates share.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Data model (`Username`, `ProfileSummary`, `PostStub`, `ScrapeResult`, ...)
//!
//! # Example
//!
//! ```rust
//! use influence_core::{AppConfig, Username};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.scraping.max_posts, 12);
//!
//! let username = Username::new("  NatGeo ")?;
//! assert_eq!(username.as_str(), "natgeo");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    AppConfig, BrowserConfig, DatabaseConfig, ScrapingConfig, MAX_ENRICHED_POSTS, MAX_POSTS,
};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use types::{
    AnalyticsResult, EnrichedPost, InfluencerRecord, PostStub, ProfileSummary, ScrapeResult,
    Username,
};
