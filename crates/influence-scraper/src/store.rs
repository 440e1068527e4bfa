//! Persistence seam for scrape results.

use async_trait::async_trait;
use influence_core::{InfluencerRecord, ScrapeResult, Username};
use influence_db::{Database, DatabaseError};

/// Replace-or-create storage keyed by username.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Write the result, replacing any previous record, and return the stored record.
    async fn upsert(&self, result: &ScrapeResult) -> Result<InfluencerRecord, DatabaseError>;

    /// Last stored record for `username`, if any.
    async fn find(&self, username: &Username) -> Result<Option<InfluencerRecord>, DatabaseError>;
}

#[async_trait]
impl ProfileStore for Database {
    async fn upsert(&self, result: &ScrapeResult) -> Result<InfluencerRecord, DatabaseError> {
        self.upsert_influencer(result).await
    }

    async fn find(&self, username: &Username) -> Result<Option<InfluencerRecord>, DatabaseError> {
        self.get_influencer(username).await
    }
}
