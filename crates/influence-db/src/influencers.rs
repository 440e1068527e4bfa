//! Influencer document storage.
//!
//! One row per account, keyed by the normalized username. Writes replace the
//! whole document (last writer wins); `created_at` is kept from the first write.

use crate::error::{DatabaseError, Result};
use chrono::{DateTime, Utc};
use influence_core::{
    AnalyticsResult, EnrichedPost, InfluencerRecord, ProfileSummary, ScrapeResult, Username,
};
use sqlx::SqlitePool;

#[derive(sqlx::FromRow)]
struct InfluencerRow {
    username: String,
    full_name: String,
    profile_picture_url: String,
    bio: String,
    followers: i64,
    following: i64,
    posts_count: i64,
    avg_likes: i64,
    avg_comments: i64,
    engagement_rate: f64,
    posts: String,
    created_at: String,
    updated_at: String,
}

impl InfluencerRow {
    fn into_record(self) -> Result<InfluencerRecord> {
        let username = Username::new(&self.username).map_err(|e| {
            DatabaseError::Decode(format!(
                "Invalid username '{}' in influencers table: {e}",
                self.username
            ))
        })?;

        let posts: Vec<EnrichedPost> = serde_json::from_str(&self.posts)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

        Ok(InfluencerRecord {
            profile: ProfileSummary {
                username,
                full_name: self.full_name,
                profile_picture_url: self.profile_picture_url,
                bio: self.bio,
                followers: to_count(self.followers),
                following: to_count(self.following),
                posts_count: to_count(self.posts_count),
            },
            analytics: AnalyticsResult {
                avg_likes: to_count(self.avg_likes),
                avg_comments: to_count(self.avg_comments),
                engagement_rate: self.engagement_rate,
            },
            posts,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn to_column(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::Decode(format!("invalid timestamp '{value}': {e}")))
}

/// Replace or create the document for the scraped username.
///
/// Returns the document as stored after the write.
pub async fn upsert_influencer(pool: &SqlitePool, result: &ScrapeResult) -> Result<InfluencerRecord> {
    let profile = &result.profile;
    let posts = serde_json::to_string(&result.posts)
        .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
    let now = Utc::now().to_rfc3339();

    let row: InfluencerRow = sqlx::query_as(
        r"
        INSERT INTO influencers (
            username, full_name, profile_picture_url, bio,
            followers, following, posts_count,
            avg_likes, avg_comments, engagement_rate,
            posts, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(username) DO UPDATE SET
            full_name = excluded.full_name,
            profile_picture_url = excluded.profile_picture_url,
            bio = excluded.bio,
            followers = excluded.followers,
            following = excluded.following,
            posts_count = excluded.posts_count,
            avg_likes = excluded.avg_likes,
            avg_comments = excluded.avg_comments,
            engagement_rate = excluded.engagement_rate,
            posts = excluded.posts,
            updated_at = excluded.updated_at
        RETURNING *
        ",
    )
    .bind(profile.username.as_str())
    .bind(&profile.full_name)
    .bind(&profile.profile_picture_url)
    .bind(&profile.bio)
    .bind(to_column(profile.followers))
    .bind(to_column(profile.following))
    .bind(to_column(profile.posts_count))
    .bind(to_column(result.analytics.avg_likes))
    .bind(to_column(result.analytics.avg_comments))
    .bind(result.analytics.engagement_rate)
    .bind(posts)
    .bind(&now)
    .bind(&now)
    .fetch_one(pool)
    .await?;

    tracing::debug!(username = %profile.username, "Influencer record upserted");

    row.into_record()
}

/// Get the stored document for a username
pub async fn get_influencer(pool: &SqlitePool, username: &Username) -> Result<Option<InfluencerRecord>> {
    let row: Option<InfluencerRow> = sqlx::query_as(
        r"
        SELECT *
        FROM influencers
        WHERE username = ?
        ",
    )
    .bind(username.as_str())
    .fetch_optional(pool)
    .await?;

    row.map(InfluencerRow::into_record).transpose()
}

/// Delete the stored document for a username
///
/// # Errors
/// Returns `DatabaseError::NotFound` if no document exists.
pub async fn delete_influencer(pool: &SqlitePool, username: &Username) -> Result<()> {
    let result = sqlx::query("DELETE FROM influencers WHERE username = ?")
        .bind(username.as_str())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound);
    }

    Ok(())
}

/// List stored usernames, most recently updated first
pub async fn list_usernames(pool: &SqlitePool) -> Result<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT username FROM influencers ORDER BY updated_at DESC, username",
    )
    .fetch_all(pool)
    .await?;

    Ok(names)
}
