//! Image tagging extension point.
//!
//! Posts carry an optional `tags` list. No classifier ships with the crate and
//! the scrape pipeline leaves `tags` unset; callers that have a classifier can
//! run [`ImageTagger::tag_posts`] over a result before storing it.

use async_trait::async_trait;
use influence_core::EnrichedPost;
use thiserror::Error;

/// Most labels kept per image.
pub const MAX_TAGS: usize = 5;

/// Predictions at or below this confidence are dropped.
pub const MIN_CONFIDENCE: f32 = 0.05;

/// One classifier label.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
}

#[derive(Debug, Error)]
#[error("Image classification failed: {0}")]
pub struct ClassifierError(pub String);

/// Labels an image by URL.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn classify(&self, image_url: &str) -> Result<Vec<Prediction>, ClassifierError>;
}

/// Keep the most confident labels above [`MIN_CONFIDENCE`], lowercased.
#[must_use]
pub fn select_tags(mut predictions: Vec<Prediction>) -> Vec<String> {
    predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    predictions
        .into_iter()
        .filter(|p| p.confidence > MIN_CONFIDENCE)
        .take(MAX_TAGS)
        .map(|p| p.label.to_lowercase())
        .collect()
}

/// Wraps a classifier; failures become an empty tag list.
pub struct ImageTagger<C> {
    classifier: C,
}

impl<C: ImageClassifier> ImageTagger<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    pub async fn tag(&self, image_url: &str) -> Vec<String> {
        if image_url.is_empty() {
            return Vec::new();
        }

        match self.classifier.classify(image_url).await {
            Ok(predictions) => select_tags(predictions),
            Err(e) => {
                tracing::warn!(image_url, "{}", e);
                Vec::new()
            }
        }
    }

    /// Set `tags` on every post from its thumbnail.
    pub async fn tag_posts(&self, posts: &mut [EnrichedPost]) {
        for post in posts {
            post.tags = Some(self.tag(&post.stub.thumbnail_url).await);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use influence_core::PostStub;

    struct Fixed(Vec<(&'static str, f32)>);

    #[async_trait]
    impl ImageClassifier for Fixed {
        async fn classify(&self, _image_url: &str) -> Result<Vec<Prediction>, ClassifierError> {
            Ok(self
                .0
                .iter()
                .map(|(label, confidence)| Prediction {
                    label: (*label).to_string(),
                    confidence: *confidence,
                })
                .collect())
        }
    }

    struct Broken;

    #[async_trait]
    impl ImageClassifier for Broken {
        async fn classify(&self, _image_url: &str) -> Result<Vec<Prediction>, ClassifierError> {
            Err(ClassifierError("model not loaded".to_string()))
        }
    }

    #[tokio::test]
    async fn test_tag_keeps_top_five_confident_labels() {
        let tagger = ImageTagger::new(Fixed(vec![
            ("Beach", 0.4),
            ("Sand", 0.2),
            ("noise", 0.05),
            ("Sea", 0.3),
            ("Sky", 0.1),
            ("Palm Tree", 0.08),
            ("Boat", 0.06),
            ("dust", 0.01),
        ]));

        let tags = tagger.tag("https://cdn.example.com/1.jpg").await;
        assert_eq!(tags, vec!["beach", "sea", "sand", "sky", "palm tree"]);
    }

    #[tokio::test]
    async fn test_tag_classifier_failure_is_empty() {
        let tagger = ImageTagger::new(Broken);
        assert!(tagger.tag("https://cdn.example.com/1.jpg").await.is_empty());
    }

    #[tokio::test]
    async fn test_tag_posts() {
        let tagger = ImageTagger::new(Fixed(vec![("Dog", 0.9)]));
        let mut posts = vec![
            EnrichedPost::from(PostStub {
                post_url: "https://www.instagram.com/p/a/".to_string(),
                thumbnail_url: "https://cdn.example.com/a.jpg".to_string(),
                caption: String::new(),
                likes: 0,
                comments: 0,
            }),
            EnrichedPost::from(PostStub {
                post_url: "https://www.instagram.com/p/b/".to_string(),
                thumbnail_url: String::new(),
                caption: String::new(),
                likes: 0,
                comments: 0,
            }),
        ];

        tagger.tag_posts(&mut posts).await;
        assert_eq!(posts[0].tags, Some(vec!["dog".to_string()]));
        assert_eq!(posts[1].tags, Some(vec![]));
    }
}
