//! Engagement analytics over scraped posts.

use influence_core::{AnalyticsResult, PostStub};

/// Average likes/comments and engagement rate for a set of posts.
///
/// Averages are rounded to the nearest integer. The engagement rate is
/// `(avg_likes + avg_comments) / followers * 100`, rounded to two decimals,
/// and 0 when there are no followers.
#[must_use]
pub fn compute_analytics(posts: &[PostStub], followers: u64) -> AnalyticsResult {
    if posts.is_empty() {
        return AnalyticsResult::default();
    }

    let total_likes: u128 = posts.iter().map(|p| u128::from(p.likes)).sum();
    let total_comments: u128 = posts.iter().map(|p| u128::from(p.comments)).sum();

    let avg_likes = rounded_mean(total_likes, posts.len());
    let avg_comments = rounded_mean(total_comments, posts.len());

    AnalyticsResult {
        avg_likes,
        avg_comments,
        engagement_rate: engagement_rate(avg_likes, avg_comments, followers),
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn rounded_mean(total: u128, count: usize) -> u64 {
    (total as f64 / count as f64).round() as u64
}

#[allow(clippy::cast_precision_loss)]
fn engagement_rate(avg_likes: u64, avg_comments: u64, followers: u64) -> f64 {
    if followers == 0 {
        return 0.0;
    }
    let rate = (avg_likes as f64 + avg_comments as f64) / followers as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}
