use crate::error::CommandError;
use crate::state::AppState;
use influence_core::{InfluencerRecord, Username};
use influence_db::DatabaseError;
use tracing::info;

fn require_username(username: &str) -> Result<&str, CommandError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(CommandError::username_required());
    }
    Ok(trimmed)
}

/// Scrape a profile, replace its stored record and return the record as stored.
pub async fn scrape_influencer(
    state: &AppState,
    username: &str,
) -> Result<InfluencerRecord, CommandError> {
    let username = require_username(username)?;
    info!("Scraping profile: {}", username);

    let record = state.orchestrator().scrape_and_save(username).await?;

    info!(
        "Stored {} with {} posts (engagement rate {:.2}%)",
        record.username(),
        record.posts.len(),
        record.analytics.engagement_rate
    );
    Ok(record)
}

/// Return the last stored record for a profile.
pub async fn fetch_influencer(
    state: &AppState,
    username: &str,
) -> Result<InfluencerRecord, CommandError> {
    let username = require_username(username)?;

    state
        .orchestrator()
        .fetch(username)
        .await?
        .ok_or_else(|| CommandError::not_found(username))
}

/// Remove the stored record for a profile and return the normalized username.
pub async fn delete_influencer(state: &AppState, username: &str) -> Result<String, CommandError> {
    let raw = require_username(username)?;
    let username = Username::new(raw)
        .map_err(|e| CommandError::new("INVALID_USERNAME", e.to_string(), 400))?;

    match state.database().delete_influencer(&username).await {
        Ok(()) => {
            info!("Deleted stored record for {}", username);
            Ok(username.to_string())
        }
        Err(DatabaseError::NotFound) => Err(CommandError::not_found(username.as_str())),
        Err(e) => Err(e.into()),
    }
}

/// Usernames with a stored record, most recently updated first.
pub async fn list_influencers(state: &AppState) -> Result<Vec<String>, CommandError> {
    Ok(state.database().list_usernames().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_username() {
        assert_eq!(require_username("  natgeo ").expect("present"), "natgeo");

        let err = require_username("   ").expect_err("blank username");
        assert_eq!(err.code, "USERNAME_REQUIRED");
        assert_eq!(err.status, 400);
    }
}
