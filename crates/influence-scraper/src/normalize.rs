//! Human-readable count parsing.
//!
//! Profile and post pages render counts as `1,234`, `1.2k`, `3M` or
//! `2 million`. Everything here is total: unparsable input yields 0 or `None`,
//! never an error.

use once_cell::sync::Lazy;
use regex::Regex;

static COUNT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]*\.?[0-9]+)\s*(?:(k|m|b|thousand|million|billion)\b)?")
        .expect("count regex is hardcoded and valid")
});

static LIKES_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([0-9][0-9.,]*\s*[kmb]?)\s*likes?")
        .expect("likes regex is hardcoded and valid")
});

static COMMENTS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([0-9][0-9.,]*\s*[kmb]?)\s*comments?")
        .expect("comments regex is hardcoded and valid")
});

/// Parse the first count in `text`, honouring k/m/b suffixes.
///
/// ```
/// use influence_scraper::normalize::parse_count;
///
/// assert_eq!(parse_count("1,234"), 1234);
/// assert_eq!(parse_count("1.5k"), 1500);
/// assert_eq!(parse_count("no digits"), 0);
/// ```
#[must_use]
pub fn parse_count(text: &str) -> u64 {
    let cleaned = text.replace(',', "").to_lowercase();
    let Some(caps) = COUNT_PATTERN.captures(cleaned.trim()) else {
        return 0;
    };

    let Ok(value) = caps[1].parse::<f64>() else {
        return 0;
    };

    let multiplier = match caps.get(2).map(|m| m.as_str()) {
        Some("k" | "thousand") => 1e3,
        Some("m" | "million") => 1e6,
        Some("b" | "billion") => 1e9,
        _ => 1.0,
    };

    to_u64((value * multiplier).round())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u64(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        // saturating float-to-int cast
        value as u64
    } else {
        0
    }
}

/// Like and comment counts found in free text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountMatch {
    /// Count preceding the first "like"/"likes"
    pub likes: Option<u64>,
    /// Count preceding the first "comment"/"comments"
    pub comments: Option<u64>,
}

impl CountMatch {
    /// Whether neither count was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.likes.is_none() && self.comments.is_none()
    }
}

/// Scan `text` for `<number><suffix> likes` and `<number><suffix> comments`.
#[must_use]
pub fn scan_counts(text: &str) -> CountMatch {
    let capture = |pattern: &Regex| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| parse_count(m.as_str()))
    };

    CountMatch {
        likes: capture(&LIKES_PATTERN),
        comments: capture(&COMMENTS_PATTERN),
    }
}
