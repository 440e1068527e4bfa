//! Scrape orchestrator.
//!
//! Drives one scrape from session acquisition to persistence. Every
//! invocation owns exactly one browser session, which is released on every
//! exit path once it has been acquired.

use crate::analytics::compute_analytics;
use crate::enrich::PostMetricsEnricher;
use crate::error::{Result, ScrapeError};
use crate::extract::{ProfileExtraction, ProfileLayout, SelectorLayout};
use crate::store::ProfileStore;
use influence_browser::{BrowserError, BrowserPage, BrowserSession, SessionLauncher};
use influence_core::{AppConfig, EnrichedPost, InfluencerRecord, ScrapeResult, ScrapingConfig, Username};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Stages of a scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeStage {
    /// Nothing started
    Idle,
    /// Browser session launched
    SessionAcquired,
    /// Profile page read and validated
    ProfileExtracted,
    /// Visiting post pages
    Enriching,
    /// Analytics derived; the result is complete
    Computed,
    /// Result written to the store
    Persisted,
    /// Aborted by a fatal error
    Failed,
    /// Session released
    Closed,
}

impl fmt::Display for ScrapeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::SessionAcquired => "session_acquired",
            Self::ProfileExtracted => "profile_extracted",
            Self::Enriching => "enriching",
            Self::Computed => "computed",
            Self::Persisted => "persisted",
            Self::Failed => "failed",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Logs stage transitions for one username.
struct StageTracker<'a> {
    username: &'a Username,
    stage: ScrapeStage,
}

impl<'a> StageTracker<'a> {
    fn new(username: &'a Username) -> Self {
        Self {
            username,
            stage: ScrapeStage::Idle,
        }
    }

    fn advance(&mut self, to: ScrapeStage) {
        tracing::info!(username = %self.username, from = %self.stage, to = %to, "Scrape stage");
        self.stage = to;
    }

    fn fail(&mut self, error: &ScrapeError) {
        tracing::error!(
            username = %self.username,
            from = %self.stage,
            to = %ScrapeStage::Failed,
            "Scrape failed: {}",
            error
        );
        self.stage = ScrapeStage::Failed;
    }
}

/// Timeouts and limits for one scrape.
#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    /// Profile URL base and post limits
    pub scraping: ScrapingConfig,
    /// Profile page navigation
    pub navigation_timeout: Duration,
    /// Network idle and landmark waits
    pub content_timeout: Duration,
    /// Post page navigation during enrichment
    pub post_navigation_timeout: Duration,
}

impl ScrapeSettings {
    /// Take timeouts and limits from the application config.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            scraping: config.scraping.clone(),
            navigation_timeout: config.browser.navigation_timeout(),
            content_timeout: config.browser.content_timeout(),
            post_navigation_timeout: config.browser.post_navigation_timeout(),
        }
    }
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Runs scrapes and serves stored records.
pub struct ScrapeOrchestrator {
    launcher: Arc<dyn SessionLauncher>,
    store: Arc<dyn ProfileStore>,
    layout: Arc<dyn ProfileLayout>,
    settings: ScrapeSettings,
}

impl ScrapeOrchestrator {
    /// Create an orchestrator with the default selector layout.
    #[must_use]
    pub fn new(
        launcher: Arc<dyn SessionLauncher>,
        store: Arc<dyn ProfileStore>,
        settings: ScrapeSettings,
    ) -> Self {
        Self {
            launcher,
            store,
            layout: Arc::new(SelectorLayout::default()),
            settings,
        }
    }

    /// Replace the page layout strategy.
    #[must_use]
    pub fn with_layout(mut self, layout: Arc<dyn ProfileLayout>) -> Self {
        self.layout = layout;
        self
    }

    /// Scrape a profile without persisting it.
    pub async fn scrape(&self, username: &str) -> Result<ScrapeResult> {
        let username = parse_username(username)?;
        let mut tracker = StageTracker::new(&username);
        self.collect(&mut tracker).await
    }

    /// Scrape a profile and replace its stored record.
    pub async fn scrape_and_save(&self, username: &str) -> Result<InfluencerRecord> {
        let username = parse_username(username)?;
        let mut tracker = StageTracker::new(&username);
        let result = self.collect(&mut tracker).await?;

        match self.store.upsert(&result).await {
            Ok(record) => {
                tracker.advance(ScrapeStage::Persisted);
                Ok(record)
            }
            Err(e) => {
                let err = ScrapeError::Persistence(e);
                tracker.fail(&err);
                Err(err)
            }
        }
    }

    /// Last stored record for a username.
    pub async fn fetch(&self, username: &str) -> Result<Option<InfluencerRecord>> {
        let username = parse_username(username)?;
        Ok(self.store.find(&username).await?)
    }

    // Acquire, scrape, and release. The session is gone when this returns.
    async fn collect(&self, tracker: &mut StageTracker<'_>) -> Result<ScrapeResult> {
        let session = match self.launcher.acquire().await {
            Ok(session) => session,
            Err(e) => {
                let err = ScrapeError::SessionAcquisition(e);
                tracker.fail(&err);
                return Err(err);
            }
        };
        tracker.advance(ScrapeStage::SessionAcquired);

        let outcome = self.run(session.as_ref(), tracker).await;
        if let Err(e) = &outcome {
            tracker.fail(e);
        }

        if let Err(e) = session.release().await {
            tracing::warn!(username = %tracker.username, "Failed to release browser session: {}", e);
        }
        tracker.advance(ScrapeStage::Closed);

        outcome
    }

    async fn run(&self, session: &dyn BrowserSession, tracker: &mut StageTracker<'_>) -> Result<ScrapeResult> {
        let username = tracker.username;
        let extraction = self.extract_profile(session, username).await?;
        tracker.advance(ScrapeStage::ProfileExtracted);

        let ProfileExtraction { profile, mut posts, .. } = extraction;

        tracker.advance(ScrapeStage::Enriching);
        let enricher = PostMetricsEnricher::new(
            self.settings.scraping.max_enriched_posts,
            self.settings.post_navigation_timeout,
        );
        enricher.enrich(session, &mut posts).await;

        let analytics = compute_analytics(&posts, profile.followers);
        tracker.advance(ScrapeStage::Computed);

        Ok(ScrapeResult {
            profile,
            posts: posts.into_iter().map(EnrichedPost::from).collect(),
            analytics,
        })
    }

    async fn extract_profile(&self, session: &dyn BrowserSession, username: &Username) -> Result<ProfileExtraction> {
        let url = self.settings.scraping.profile_url(username.as_str());
        let page_url = Url::parse(&url).map_err(|e| ScrapeError::SessionNavigation {
            url: url.clone(),
            source: BrowserError::Navigation(format!("invalid profile URL: {e}")),
        })?;

        let page = session
            .open(&url, self.settings.navigation_timeout)
            .await
            .map_err(|source| ScrapeError::SessionNavigation {
                url: url.clone(),
                source,
            })?;

        let html = self.read_profile_page(page.as_ref()).await;

        if let Err(e) = page.close().await {
            tracing::warn!(%url, "Failed to close profile page: {}", e);
        }

        let extraction = self
            .layout
            .extract(&html?, &page_url, username, self.settings.scraping.max_posts);

        if extraction.profile.is_missing_essentials() {
            return Err(ScrapeError::EssentialDataMissing {
                username: username.to_string(),
                marker: extraction.error,
            });
        }

        Ok(extraction)
    }

    async fn read_profile_page(&self, page: &dyn BrowserPage) -> Result<String> {
        let timeout = self.settings.content_timeout;

        if let Err(e) = page.wait_for_network_idle(timeout).await {
            tracing::debug!(url = page.url(), "Network idle wait ended early: {}", e);
        }

        let landmark = self.layout.landmark();
        page.wait_for_selector(landmark, timeout)
            .await
            .map_err(|e| ScrapeError::ContentNotFound {
                url: page.url().to_string(),
                landmark: landmark.to_string(),
                reason: e.to_string(),
            })?;

        page.content()
            .await
            .map_err(|source| ScrapeError::SessionNavigation {
                url: page.url().to_string(),
                source,
            })
    }
}

fn parse_username(raw: &str) -> Result<Username> {
    Username::new(raw).map_err(|e| ScrapeError::InvalidUsername(e.to_string()))
}
