//! Error types for CLI commands.

use influence_core::ConfigError;
use influence_db::DatabaseError;
use influence_scraper::ScrapeError;
use serde::Serialize;

/// Serializable error reported by a command.
#[derive(Debug, Serialize)]
pub struct CommandError {
    /// Error code for scripted handling (e.g., "NOT_FOUND")
    pub code: String,
    /// User-friendly error message
    pub message: String,
    /// HTTP-style status class: 400 bad input, 404 missing, 502 upstream page, 500 internal
    pub status: u16,
    /// Optional debugging context
    pub details: Option<serde_json::Value>,
}

impl CommandError {
    /// Create a new command error.
    pub fn new(code: impl Into<String>, message: impl Into<String>, status: u16) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            status,
            details: None,
        }
    }

    /// Attach debugging context.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// No stored record for the username.
    pub fn not_found(username: &str) -> Self {
        Self::new(
            "NOT_FOUND",
            format!("No stored record for '{username}'"),
            404,
        )
    }

    /// The username argument was empty.
    pub fn username_required() -> Self {
        Self::new("USERNAME_REQUIRED", "Username is required", 400)
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.code, self.status, self.message)
    }
}

impl std::error::Error for CommandError {}

/// Convert ScrapeError to CommandError.
impl From<ScrapeError> for CommandError {
    fn from(err: ScrapeError) -> Self {
        let message = err.to_string();
        match err {
            ScrapeError::InvalidUsername(_) => Self::new("INVALID_USERNAME", message, 400),
            ScrapeError::SessionAcquisition(_) => {
                Self::new("SESSION_ACQUISITION_FAILED", message, 500)
            }
            ScrapeError::SessionNavigation { url, .. } => {
                Self::new("NAVIGATION_FAILED", message, 502)
                    .with_details(serde_json::json!({ "url": url }))
            }
            ScrapeError::ContentNotFound { url, landmark, .. } => {
                Self::new("CONTENT_NOT_FOUND", message, 502)
                    .with_details(serde_json::json!({ "url": url, "landmark": landmark }))
            }
            ScrapeError::EssentialDataMissing { username, marker } => {
                Self::new("ESSENTIAL_DATA_MISSING", message, 502)
                    .with_details(serde_json::json!({ "username": username, "marker": marker }))
            }
            ScrapeError::PostEnrichment { post_url, .. } => {
                Self::new("POST_ENRICHMENT_FAILED", message, 502)
                    .with_details(serde_json::json!({ "postUrl": post_url }))
            }
            ScrapeError::Persistence(_) => Self::new("PERSISTENCE_FAILED", message, 500),
        }
    }
}

/// Convert DatabaseError to CommandError.
impl From<DatabaseError> for CommandError {
    fn from(err: DatabaseError) -> Self {
        Self::new("DATABASE_ERROR", format!("Database error: {err}"), 500)
    }
}

/// Convert ConfigError to CommandError.
impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        Self::new("CONFIG_ERROR", format!("Configuration error: {err}"), 500)
    }
}

/// Convert serde_json::Error to CommandError.
impl From<serde_json::Error> for CommandError {
    fn from(err: serde_json::Error) -> Self {
        Self::new("SERIALIZATION_ERROR", format!("Serialization error: {err}"), 500)
    }
}
