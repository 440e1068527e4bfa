//! Profile page extraction.
//!
//! Extraction is a pure function of the rendered HTML. Everything specific to
//! the profile site's DOM lives behind [`ProfileLayout`]; the default
//! implementation is driven by [`ProfileSelectors`], where every field is an
//! ordered list of CSS selectors and the first one that yields a value wins.

use crate::normalize::{parse_count, scan_counts};
use influence_core::{PostStub, ProfileSummary, Username};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// What a layout could read from a profile page.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileExtraction {
    /// Profile fields; unresolved fields stay empty or 0
    pub profile: ProfileSummary,
    /// Post stubs in page order
    pub posts: Vec<PostStub>,
    /// Set when extraction stopped early; fields read before the failure are kept
    pub error: Option<String>,
}

impl ProfileExtraction {
    fn empty(username: Username) -> Self {
        Self {
            profile: ProfileSummary::empty(username),
            posts: Vec::new(),
            error: None,
        }
    }
}

/// DOM knowledge for one profile site.
pub trait ProfileLayout: Send + Sync {
    /// Selector that must be present before the page is considered rendered.
    fn landmark(&self) -> &str;

    /// Read the profile and up to `max_posts` post stubs from `html`.
    ///
    /// Never fails: problems are reported through [`ProfileExtraction::error`].
    fn extract(
        &self,
        html: &str,
        page_url: &Url,
        username: &Username,
        max_posts: usize,
    ) -> ProfileExtraction;
}

/// Ordered selector lists for each profile field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSelectors {
    /// Element that marks the page as rendered
    pub landmark: String,
    /// Elements whose `src` is the profile image
    pub profile_image: Vec<String>,
    /// Display name
    pub full_name: Vec<String>,
    /// Bio text, primary selector first
    pub bio: Vec<String>,
    /// Stat items read by position: posts, followers, following
    pub stats: Vec<String>,
    /// Anchors linking to posts; only those wrapping an `img` count
    pub post_anchors: Vec<String>,
}

impl Default for ProfileSelectors {
    fn default() -> Self {
        Self {
            landmark: "main".to_string(),
            profile_image: vec!["header img".to_string()],
            full_name: vec![
                "header section h1".to_string(),
                "header section span[dir='auto']".to_string(),
                "header h2".to_string(),
            ],
            bio: vec![
                "header section h1 + span".to_string(),
                "header section div > span".to_string(),
            ],
            stats: vec!["header ul li".to_string()],
            post_anchors: vec!["main article a".to_string(), "main a".to_string()],
        }
    }
}

/// [`ProfileLayout`] driven by a [`ProfileSelectors`] table.
#[derive(Debug, Clone, Default)]
pub struct SelectorLayout {
    selectors: ProfileSelectors,
}

impl SelectorLayout {
    /// Create a layout from a selector table.
    #[must_use]
    pub fn new(selectors: ProfileSelectors) -> Self {
        Self { selectors }
    }

    /// Selector table in use
    #[must_use]
    pub fn selectors(&self) -> &ProfileSelectors {
        &self.selectors
    }

    // Fields are read in page order; an error leaves the remaining ones unresolved.
    fn fill(
        &self,
        document: &Html,
        page_url: &Url,
        max_posts: usize,
        out: &mut ProfileExtraction,
    ) -> std::result::Result<(), String> {
        let profile = &mut out.profile;

        if let Some(src) = first_attr(document, &self.selectors.profile_image, "src")? {
            profile.profile_picture_url = resolve(page_url, &src);
        }

        if let Some(name) = first_text(document, &self.selectors.full_name)? {
            profile.full_name = name;
        }

        if let Some(bio) = first_text(document, &self.selectors.bio)? {
            profile.bio = bio;
        }

        let stats = first_stats(document, &self.selectors.stats)?;
        if let [posts, followers, following, ..] = stats.as_slice() {
            profile.posts_count = parse_count(posts);
            profile.followers = parse_count(followers);
            profile.following = parse_count(following);
        }

        out.posts = first_posts(document, &self.selectors.post_anchors, page_url, max_posts)?;

        Ok(())
    }
}

impl ProfileLayout for SelectorLayout {
    fn landmark(&self) -> &str {
        &self.selectors.landmark
    }

    fn extract(
        &self,
        html: &str,
        page_url: &Url,
        username: &Username,
        max_posts: usize,
    ) -> ProfileExtraction {
        let document = Html::parse_document(html);
        let mut extraction = ProfileExtraction::empty(username.clone());

        if let Err(marker) = self.fill(&document, page_url, max_posts, &mut extraction) {
            tracing::warn!(%username, "Profile extraction incomplete: {}", marker);
            extraction.error = Some(marker);
        }

        tracing::debug!(
            %username,
            followers = extraction.profile.followers,
            following = extraction.profile.following,
            posts_count = extraction.profile.posts_count,
            stubs = extraction.posts.len(),
            "Profile extracted"
        );

        extraction
    }
}

fn compile(selector: &str) -> std::result::Result<Selector, String> {
    Selector::parse(selector).map_err(|e| format!("invalid selector '{selector}': {e}"))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_text(document: &Html, selectors: &[String]) -> std::result::Result<Option<String>, String> {
    for raw in selectors {
        let selector = compile(raw)?;
        let found = document
            .select(&selector)
            .map(|el| element_text(&el))
            .find(|text| !text.is_empty());
        if found.is_some() {
            return Ok(found);
        }
    }
    Ok(None)
}

fn first_attr(
    document: &Html,
    selectors: &[String],
    attr: &str,
) -> std::result::Result<Option<String>, String> {
    for raw in selectors {
        let selector = compile(raw)?;
        let found = document
            .select(&selector)
            .filter_map(|el| el.value().attr(attr))
            .map(str::trim)
            .find(|value| !value.is_empty());
        if let Some(value) = found {
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}

fn first_stats(document: &Html, selectors: &[String]) -> std::result::Result<Vec<String>, String> {
    for raw in selectors {
        let selector = compile(raw)?;
        let items: Vec<String> = document.select(&selector).map(|el| element_text(&el)).collect();
        if items.len() >= 3 {
            return Ok(items);
        }
    }
    Ok(Vec::new())
}

fn first_posts(
    document: &Html,
    selectors: &[String],
    page_url: &Url,
    max_posts: usize,
) -> std::result::Result<Vec<PostStub>, String> {
    let img = compile("img")?;

    for raw in selectors {
        let selector = compile(raw)?;
        let posts: Vec<PostStub> = document
            .select(&selector)
            .filter_map(|anchor| post_stub(&anchor, &img, page_url))
            .take(max_posts)
            .collect();
        if !posts.is_empty() {
            return Ok(posts);
        }
    }
    Ok(Vec::new())
}

fn post_stub(anchor: &ElementRef<'_>, img: &Selector, page_url: &Url) -> Option<PostStub> {
    let href = anchor.value().attr("href").map(str::trim).filter(|h| !h.is_empty())?;
    let image = anchor.select(img).next()?;

    let caption = image.value().attr("alt").unwrap_or_default().trim().to_string();
    let thumbnail_url = image
        .value()
        .attr("src")
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(|src| resolve(page_url, src))
        .unwrap_or_default();
    let guess = scan_counts(&caption);

    Some(PostStub {
        post_url: resolve(page_url, href),
        thumbnail_url,
        caption,
        likes: guess.likes.unwrap_or(0),
        comments: guess.comments.unwrap_or(0),
    })
}

fn resolve(base: &Url, reference: &str) -> String {
    base.join(reference)
        .map_or_else(|_| reference.to_string(), String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://www.instagram.com/someone/").expect("valid url")
    }

    fn username() -> Username {
        Username::new("someone").expect("valid username")
    }

    fn profile_html(anchors: usize) -> String {
        let posts: String = (0..anchors)
            .map(|i| {
                format!(
                    r#"<article><a href="/p/post{i}/"><img src="/thumbs/{i}.jpg" alt="Photo {i}. {i}0 likes, {i} comments"></a></article>"#
                )
            })
            .collect();

        format!(
            r#"<html><body>
            <header>
              <img src="https://cdn.example.com/avatar.jpg" alt="avatar">
              <section>
                <h2>Some One</h2>
                <ul>
                  <li><span>120</span> posts</li>
                  <li><span>1.2k</span> followers</li>
                  <li><span>300</span> following</li>
                </ul>
                <h1>Some One</h1><span>Travel and coffee</span>
              </section>
            </header>
            <main>{posts}</main>
            </body></html>"#
        )
    }

    #[test]
    fn test_extract_profile_scenario() {
        let layout = SelectorLayout::default();
        let extraction = layout.extract(&profile_html(12), &page_url(), &username(), 12);

        assert!(extraction.error.is_none());
        let profile = &extraction.profile;
        assert_eq!(profile.username.as_str(), "someone");
        assert_eq!(profile.full_name, "Some One");
        assert_eq!(profile.profile_picture_url, "https://cdn.example.com/avatar.jpg");
        assert_eq!(profile.bio, "Travel and coffee");
        assert_eq!(profile.posts_count, 120);
        assert_eq!(profile.followers, 1200);
        assert_eq!(profile.following, 300);
        assert_eq!(extraction.posts.len(), 12);
    }

    #[test]
    fn test_post_stubs_resolve_urls_and_guess_counts() {
        let layout = SelectorLayout::default();
        let extraction = layout.extract(&profile_html(3), &page_url(), &username(), 12);

        let post = &extraction.posts[2];
        assert_eq!(post.post_url, "https://www.instagram.com/p/post2/");
        assert_eq!(post.thumbnail_url, "https://www.instagram.com/thumbs/2.jpg");
        assert_eq!(post.caption, "Photo 2. 20 likes, 2 comments");
        assert_eq!(post.likes, 20);
        assert_eq!(post.comments, 2);
    }

    #[test]
    fn test_post_stubs_capped() {
        let layout = SelectorLayout::default();
        let extraction = layout.extract(&profile_html(20), &page_url(), &username(), 12);
        assert_eq!(extraction.posts.len(), 12);
        assert_eq!(extraction.posts[0].post_url, "https://www.instagram.com/p/post0/");
    }

    #[test]
    fn test_anchors_without_href_or_image_are_skipped() {
        let html = r#"<html><body><header><h2>Name</h2></header><main>
            <a href="/explore/">Explore</a>
            <a><img src="/a.jpg"></a>
            <a href="/p/keep/"><img src="/keep.jpg" alt="kept"></a>
            </main></body></html>"#;
        let extraction = SelectorLayout::default().extract(html, &page_url(), &username(), 12);

        assert_eq!(extraction.posts.len(), 1);
        assert_eq!(extraction.posts[0].post_url, "https://www.instagram.com/p/keep/");
        assert_eq!(extraction.posts[0].likes, 0);
    }

    #[test]
    fn test_missing_stats_are_zero() {
        let html = r#"<html><body><header><img src="/me.jpg">
            <ul><li>5 posts</li><li>10 followers</li></ul></header><main></main></body></html>"#;
        let extraction = SelectorLayout::default().extract(html, &page_url(), &username(), 12);

        assert!(extraction.error.is_none());
        assert_eq!(extraction.profile.posts_count, 0);
        assert_eq!(extraction.profile.followers, 0);
        assert_eq!(extraction.profile.following, 0);
        assert!(extraction.posts.is_empty());
    }

    #[test]
    fn test_empty_page_is_missing_essentials() {
        let html = "<html><body><main></main></body></html>";
        let extraction = SelectorLayout::default().extract(html, &page_url(), &username(), 12);

        assert!(extraction.error.is_none());
        assert!(extraction.profile.is_missing_essentials());
    }

    #[test]
    fn test_name_selector_fallback() {
        let html = r#"<html><body><header><section><h1>Fallback Name</h1></section></header>
            <main></main></body></html>"#;
        let extraction = SelectorLayout::default().extract(html, &page_url(), &username(), 12);
        assert_eq!(extraction.profile.full_name, "Fallback Name");
    }

    #[test]
    fn test_display_name_preferred_over_handle() {
        let html = r#"<html><body><header><img src="/me.jpg"><section>
            <div><h2>janedoe</h2></div>
            <div><h1>Jane Doe</h1><span>Bio</span></div>
            </section></header><main></main></body></html>"#;
        let extraction = SelectorLayout::default().extract(html, &page_url(), &username(), 12);
        assert_eq!(extraction.profile.full_name, "Jane Doe");
    }

    #[test]
    fn test_invalid_selector_keeps_partial_data() {
        let selectors = ProfileSelectors {
            bio: vec!["header span[".to_string()],
            ..ProfileSelectors::default()
        };
        let layout = SelectorLayout::new(selectors);
        let extraction = layout.extract(&profile_html(2), &page_url(), &username(), 12);

        let marker = extraction.error.expect("error marker");
        assert!(marker.contains("invalid selector"));
        assert_eq!(extraction.profile.full_name, "Some One");
        assert_eq!(
            extraction.profile.profile_picture_url,
            "https://cdn.example.com/avatar.jpg"
        );
        assert_eq!(extraction.profile.followers, 0);
        assert!(extraction.posts.is_empty());
    }

    #[test]
    fn test_landmark() {
        assert_eq!(SelectorLayout::default().landmark(), "main");
    }
}
