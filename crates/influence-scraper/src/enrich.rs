//! Post metric enrichment.
//!
//! Visits individual post pages, one at a time, to refine the like and
//! comment guesses taken from the profile grid. Nothing here can fail the
//! scrape: a post that cannot be read keeps its provisional counts.

use crate::error::{Result, ScrapeError};
use crate::normalize::{scan_counts, CountMatch};
use influence_browser::{BrowserPage, BrowserSession};
use influence_core::PostStub;
use scraper::{Html, Selector};
use std::time::Duration;

/// Where a post page exposes its counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSource {
    /// `aria-label` attribute values, joined
    AriaLabels,
    /// Rendered body text
    BodyText,
}

/// Passes in precedence order; for each count the first pass that finds it wins.
pub const METRIC_PASSES: [MetricSource; 2] = [MetricSource::AriaLabels, MetricSource::BodyText];

/// Raw text captured from a post page.
#[derive(Debug, Clone, Default)]
pub struct PostSnapshot {
    /// `document.body.innerText`
    pub body_text: String,
    /// Serialized DOM
    pub html: String,
}

impl PostSnapshot {
    fn source_text(&self, source: MetricSource) -> String {
        match source {
            MetricSource::AriaLabels => aria_labels(&self.html),
            MetricSource::BodyText => self.body_text.clone(),
        }
    }
}

/// Scan a post page for like and comment counts.
#[must_use]
pub fn scan_post_metrics(snapshot: &PostSnapshot) -> CountMatch {
    let mut found = CountMatch::default();

    for source in METRIC_PASSES {
        if found.likes.is_some() && found.comments.is_some() {
            break;
        }
        let pass = scan_counts(&snapshot.source_text(source));
        found.likes = found.likes.or(pass.likes);
        found.comments = found.comments.or(pass.comments);
    }

    found
}

/// All `aria-label` values in document order, joined into one scannable string.
#[must_use]
pub fn aria_labels(html: &str) -> String {
    let Ok(selector) = Selector::parse("[aria-label]") else {
        return String::new();
    };
    let document = Html::parse_document(html);

    document
        .select(&selector)
        .filter_map(|el| el.value().attr("aria-label"))
        .collect::<Vec<_>>()
        .join(" \n ")
}

/// Overwrite the counts that were found; keep the rest.
pub fn apply_metrics(post: &mut PostStub, metrics: CountMatch) {
    if let Some(likes) = metrics.likes {
        post.likes = likes;
    }
    if let Some(comments) = metrics.comments {
        post.comments = comments;
    }
}

/// Outcome counters for one enrichment run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    /// Posts whose page was visited
    pub attempted: usize,
    /// Visits that found at least one count
    pub refined: usize,
    /// Visits that failed and left the post unchanged
    pub failed: usize,
}

/// Refines post stubs by visiting their pages through a browser session.
#[derive(Debug, Clone)]
pub struct PostMetricsEnricher {
    max_posts: usize,
    navigation_timeout: Duration,
}

impl PostMetricsEnricher {
    /// Create an enricher visiting at most `max_posts` posts.
    #[must_use]
    pub fn new(max_posts: usize, navigation_timeout: Duration) -> Self {
        Self {
            max_posts,
            navigation_timeout,
        }
    }

    /// Enrich the leading posts in place, sequentially.
    pub async fn enrich(&self, session: &dyn BrowserSession, posts: &mut [PostStub]) -> EnrichmentReport {
        let mut report = EnrichmentReport::default();
        let limit = self.max_posts.min(posts.len());

        for post in &mut posts[..limit] {
            if post.post_url.is_empty() {
                continue;
            }
            report.attempted += 1;

            match self.fetch_metrics(session, &post.post_url).await {
                Ok(metrics) => {
                    if !metrics.is_empty() {
                        report.refined += 1;
                    }
                    apply_metrics(post, metrics);
                    tracing::debug!(
                        post_url = %post.post_url,
                        likes = post.likes,
                        comments = post.comments,
                        "Post enriched"
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!("{}", e);
                }
            }
        }

        tracing::info!(
            attempted = report.attempted,
            refined = report.refined,
            failed = report.failed,
            "Post enrichment finished"
        );

        report
    }

    async fn fetch_metrics(&self, session: &dyn BrowserSession, post_url: &str) -> Result<CountMatch> {
        let to_error = |source| ScrapeError::PostEnrichment {
            post_url: post_url.to_string(),
            source,
        };

        let page = session
            .open(post_url, self.navigation_timeout)
            .await
            .map_err(to_error)?;

        // Counts are rendered client-side after the load event
        if let Err(e) = page.wait_for_network_idle(self.navigation_timeout).await {
            tracing::debug!(post_url, "Network idle wait ended early: {}", e);
        }

        let snapshot = read_snapshot(page.as_ref()).await;

        if let Err(e) = page.close().await {
            tracing::warn!(post_url, "Failed to close post page: {}", e);
        }

        Ok(scan_post_metrics(&snapshot.map_err(to_error)?))
    }
}

async fn read_snapshot(page: &dyn BrowserPage) -> influence_browser::Result<PostSnapshot> {
    let body_text = page.visible_text().await?;
    let html = page.content().await?;
    Ok(PostSnapshot { body_text, html })
}
