use influence_browser::BrowserError;
use influence_db::DatabaseError;
use thiserror::Error;

/// Errors raised while scraping, enriching or persisting a profile.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Failed to acquire browser session: {0}")]
    SessionAcquisition(#[source] BrowserError),

    #[error("Failed to load {url}: {source}")]
    SessionNavigation {
        url: String,
        #[source]
        source: BrowserError,
    },

    #[error("Profile content not found at {url} (waited for '{landmark}'): {reason}")]
    ContentNotFound {
        url: String,
        landmark: String,
        reason: String,
    },

    #[error("Essential profile data missing for {username}{}", marker_suffix(.marker))]
    EssentialDataMissing {
        username: String,
        marker: Option<String>,
    },

    #[error("Failed to enrich post {post_url}: {source}")]
    PostEnrichment {
        post_url: String,
        #[source]
        source: BrowserError,
    },

    #[error("Persistence error: {0}")]
    Persistence(#[from] DatabaseError),
}

fn marker_suffix(marker: &Option<String>) -> String {
    marker
        .as_ref()
        .map(|m| format!(" ({m})"))
        .unwrap_or_default()
}

impl ScrapeError {
    /// Whether the error aborts the scrape.
    ///
    /// Only per-post enrichment failures are recoverable; they are logged and
    /// the post keeps its provisional counts.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::PostEnrichment { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_enrichment_is_recoverable() {
        let enrichment = ScrapeError::PostEnrichment {
            post_url: "https://example.com/p/1/".to_string(),
            source: BrowserError::Timeout("45s".to_string()),
        };
        assert!(!enrichment.is_fatal());

        let fatal = [
            ScrapeError::InvalidUsername("empty".to_string()),
            ScrapeError::SessionAcquisition(BrowserError::Launch("no chrome".to_string())),
            ScrapeError::ContentNotFound {
                url: "https://example.com/a/".to_string(),
                landmark: "main".to_string(),
                reason: "timed out".to_string(),
            },
            ScrapeError::EssentialDataMissing {
                username: "a".to_string(),
                marker: None,
            },
            ScrapeError::Persistence(DatabaseError::NotFound),
        ];
        assert!(fatal.iter().all(ScrapeError::is_fatal));
    }

    #[test]
    fn test_essential_data_message_includes_marker() {
        let err = ScrapeError::EssentialDataMissing {
            username: "someone".to_string(),
            marker: Some("invalid selector".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Essential profile data missing for someone (invalid selector)"
        );

        let err = ScrapeError::EssentialDataMissing {
            username: "someone".to_string(),
            marker: None,
        };
        assert_eq!(err.to_string(), "Essential profile data missing for someone");
    }
}
