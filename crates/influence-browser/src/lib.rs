//! Browser session management for JavaScript-rendered profile pages.
//!
//! Provides an isolated headless Chromium session per scrape with static
//! user-agent and header spoofing. The session and its pages are exposed
//! through the [`SessionLauncher`], [`BrowserSession`] and [`BrowserPage`]
//! traits so callers hold them as explicit resource values.

pub mod actions;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod page;

pub use actions::{BrowserPage, BrowserSession, SessionLauncher};
pub use engine::{ChromiumLauncher, ChromiumSession};
pub use error::{BrowserError, Result};
pub use fingerprint::FingerprintConfig;
pub use page::ChromiumPage;
