//! Influence Scraper - profile scraping and engagement analytics.
//!
//! This crate turns a username into a structured engagement report. It drives
//! a browser session through the profile page and a handful of post pages,
//! extracts counts from the rendered DOM, derives averages and an engagement
//! rate, and hands the result to the document store.
//!
//! # Pipeline
//!
//! - Acquire one isolated browser session per scrape
//! - Read the profile page through a [`ProfileLayout`] strategy
//! - Refine like/comment counts on up to ten post pages
//! - Compute analytics and persist with replace-or-create semantics
//!
//! # Example
//!
//! ```rust,ignore
//! use influence_scraper::{ScrapeOrchestrator, ScrapeSettings};
//! use std::sync::Arc;
//!
//! let orchestrator = ScrapeOrchestrator::new(
//!     Arc::new(ChromiumLauncher::new(config.browser.clone())),
//!     Arc::new(database),
//!     ScrapeSettings::from_config(&config),
//! );
//!
//! let record = orchestrator.scrape_and_save("someone").await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod analytics;
pub mod enrich;
#[allow(missing_docs)]
pub mod error;
pub mod extract;
pub mod normalize;
pub mod orchestrator;
pub mod store;
#[allow(missing_docs)]
pub mod tagging;

// Re-export commonly used types
pub use analytics::compute_analytics;
pub use enrich::{EnrichmentReport, PostMetricsEnricher};
pub use error::{Result, ScrapeError};
pub use extract::{ProfileExtraction, ProfileLayout, ProfileSelectors, SelectorLayout};
pub use normalize::parse_count;
pub use orchestrator::{ScrapeOrchestrator, ScrapeSettings, ScrapeStage};
pub use store::ProfileStore;
pub use tagging::{ImageClassifier, ImageTagger, Prediction};
