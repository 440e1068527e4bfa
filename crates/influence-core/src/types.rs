//! Shared types used across the Influence workspace.
//!
//! This module defines the username newtype used as the storage key and the
//! profile, post and analytics records produced by a scrape.

use crate::error::CoreError;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Newtype for account usernames.
///
/// Usernames are trimmed and lowercased on construction, so two spellings of
/// the same account always map to the same lookup and storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Username(String);

impl Username {
    /// Create a new `Username`, normalizing case and surrounding whitespace.
    ///
    /// # Errors
    /// Returns error if the normalized name is empty, longer than 30
    /// characters, or contains characters other than `a-z`, `0-9`, `.` and `_`.
    pub fn new(name: impl AsRef<str>) -> Result<Self, CoreError> {
        let name = name.as_ref().trim().to_lowercase();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(name: &str) -> Result<(), CoreError> {
        static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex =
            USERNAME_REGEX.get_or_init(|| Regex::new(r"^[a-z0-9._]+$").expect("valid regex"));

        if name.is_empty() {
            return Err(CoreError::Validation("username is required".to_string()));
        }

        if name.len() > 30 {
            return Err(CoreError::Validation(format!(
                "invalid username: must be at most 30 characters, got {} characters",
                name.len()
            )));
        }

        if regex.is_match(name) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "invalid username: only letters, digits, '.' and '_' are allowed, got '{name}'"
            )))
        }
    }
}

impl TryFrom<String> for Username {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Top-level identity and stat fields of a scraped account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    /// Normalized account name
    pub username: Username,
    /// Display name shown on the profile header
    pub full_name: String,
    /// Source URL of the profile image
    pub profile_picture_url: String,
    /// Profile biography text
    pub bio: String,
    /// Follower count (0 when unresolved)
    pub followers: u64,
    /// Following count (0 when unresolved)
    pub following: u64,
    /// Number of posts (0 when unresolved)
    pub posts_count: u64,
}

impl ProfileSummary {
    /// Create an empty summary for `username` with every field unresolved.
    #[must_use]
    pub fn empty(username: Username) -> Self {
        Self {
            username,
            full_name: String::new(),
            profile_picture_url: String::new(),
            bio: String::new(),
            followers: 0,
            following: 0,
            posts_count: 0,
        }
    }

    /// Whether neither a profile image nor a display name was found.
    #[must_use]
    pub fn is_missing_essentials(&self) -> bool {
        self.profile_picture_url.trim().is_empty() && self.full_name.trim().is_empty()
    }
}

/// A post reference with thumbnail, caption and provisional metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStub {
    /// Absolute URL of the post page
    pub post_url: String,
    /// Absolute URL of the thumbnail image
    pub thumbnail_url: String,
    /// Caption taken from the thumbnail's alternative text
    pub caption: String,
    /// Like count, a guess until enrichment refines it
    pub likes: u64,
    /// Comment count, a guess until enrichment refines it
    pub comments: u64,
}

/// A post stub plus the fields reserved for image tagging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedPost {
    /// Post reference and metrics
    #[serde(flatten)]
    pub stub: PostStub,
    /// Descriptive labels for the thumbnail, when tagged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Free-form mood label, when tagged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibe: Option<String>,
}

impl From<PostStub> for EnrichedPost {
    fn from(stub: PostStub) -> Self {
        Self {
            stub,
            tags: None,
            vibe: None,
        }
    }
}

/// Engagement analytics computed over the scraped posts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResult {
    /// Mean likes per post, rounded
    pub avg_likes: u64,
    /// Mean comments per post, rounded
    pub avg_comments: u64,
    /// `(avg_likes + avg_comments) / followers * 100`, two decimals
    pub engagement_rate: f64,
}

/// Result of one scrape invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    /// Profile identity and stats
    pub profile: ProfileSummary,
    /// Posts in page order
    pub posts: Vec<EnrichedPost>,
    /// Engagement analytics
    pub analytics: AnalyticsResult,
}

/// The persisted document for one username.
///
/// Replaced wholesale on every successful scrape; `created_at` is kept from
/// the first write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluencerRecord {
    /// Profile identity and stats
    #[serde(flatten)]
    pub profile: ProfileSummary,
    /// Engagement analytics
    #[serde(flatten)]
    pub analytics: AnalyticsResult,
    /// Posts in page order
    pub posts: Vec<EnrichedPost>,
    /// When the record was first stored
    pub created_at: DateTime<Utc>,
    /// When the record was last replaced
    pub updated_at: DateTime<Utc>,
}

impl InfluencerRecord {
    /// Username key of the record.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.profile.username
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub(likes: u64, comments: u64) -> PostStub {
        PostStub {
            post_url: "https://www.instagram.com/p/abc/".to_string(),
            thumbnail_url: "https://cdn.example.com/abc.jpg".to_string(),
            caption: "Sunset".to_string(),
            likes,
            comments,
        }
    }

    #[test]
    fn test_username_normalized() {
        let username = Username::new("  NatGeo  ").expect("valid username");
        assert_eq!(username.as_str(), "natgeo");
        assert_eq!(username.to_string(), "natgeo");
    }

    #[test]
    fn test_username_same_key_for_different_spellings() {
        let a = Username::new("Some.User_1").expect("valid username");
        let b = Username::new("some.user_1 ").expect("valid username");
        assert_eq!(a, b);
    }

    #[test]
    fn test_username_invalid() {
        let too_long = "a".repeat(31);
        let invalid = vec!["", "   ", "bad name", "semi;colon", "../etc", too_long.as_str()];

        for name in invalid {
            assert!(Username::new(name).is_err(), "Should fail for: {name:?}");
        }
    }

    #[test]
    fn test_username_deserialization_normalizes() {
        let username: Username = serde_json::from_str(r#"" NatGeo ""#).expect("valid username");
        assert_eq!(username.as_str(), "natgeo");

        assert!(serde_json::from_str::<Username>(r#""bad name""#).is_err());
        assert!(serde_json::from_str::<Username>(r#""""#).is_err());

        let profile: Result<ProfileSummary, _> = serde_json::from_value(serde_json::json!({
            "username": "../etc",
            "fullName": "",
            "profilePictureUrl": "",
            "bio": "",
            "followers": 0,
            "following": 0,
            "postsCount": 0
        }));
        assert!(profile.is_err());
    }

    #[test]
    fn test_profile_missing_essentials() {
        let mut profile = ProfileSummary::empty(Username::new("someone").expect("valid"));
        assert!(profile.is_missing_essentials());

        profile.full_name = "Some One".to_string();
        assert!(!profile.is_missing_essentials());

        profile.full_name = String::new();
        profile.profile_picture_url = "https://cdn.example.com/pic.jpg".to_string();
        assert!(!profile.is_missing_essentials());
    }

    #[test]
    fn test_enriched_post_serialization() {
        let post = EnrichedPost::from(stub(10, 2));
        let json = serde_json::to_value(&post).expect("serialize post");

        assert_eq!(json["postUrl"], "https://www.instagram.com/p/abc/");
        assert_eq!(json["likes"], 10);
        assert!(json.get("tags").is_none());
        assert!(json.get("vibe").is_none());

        let back: EnrichedPost = serde_json::from_value(json).expect("deserialize post");
        assert_eq!(back, post);
    }

    #[test]
    fn test_record_serialization_is_flat() {
        let now = Utc::now();
        let record = InfluencerRecord {
            profile: ProfileSummary::empty(Username::new("someone").expect("valid")),
            analytics: AnalyticsResult {
                avg_likes: 150,
                avg_comments: 15,
                engagement_rate: 1.65,
            },
            posts: vec![EnrichedPost::from(stub(1, 1))],
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&record).expect("serialize record");
        assert_eq!(json["username"], "someone");
        assert_eq!(json["avgLikes"], 150);
        assert_eq!(json["engagementRate"], 1.65);
        assert_eq!(json["posts"].as_array().map(Vec::len), Some(1));
    }
}
