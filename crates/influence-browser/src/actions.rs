use crate::error::Result;
use std::time::Duration;

/// Starts isolated browser sessions
#[async_trait::async_trait]
pub trait SessionLauncher: Send + Sync {
    /// Launch a fresh session. On error no session exists and nothing needs releasing.
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>>;
}

/// One browser process, scoped to a single scrape
#[async_trait::async_trait]
pub trait BrowserSession: Send + Sync {
    /// Open a tab with the session's identity applied and navigate it to `url`.
    ///
    /// The tab is closed before returning if navigation fails.
    async fn open(&self, url: &str, timeout: Duration) -> Result<Box<dyn BrowserPage>>;

    /// Shut the browser down. Must be called exactly once per acquired session.
    async fn release(self: Box<Self>) -> Result<()>;
}

/// An open tab
#[async_trait::async_trait]
pub trait BrowserPage: Send + Sync {
    /// URL the page was opened with
    fn url(&self) -> &str;

    /// Wait until the page stops issuing requests
    async fn wait_for_network_idle(&self, timeout: Duration) -> Result<()>;

    /// Wait for a selector to appear
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Serialized DOM of the page
    async fn content(&self) -> Result<String>;

    /// Rendered text of the page body
    async fn visible_text(&self) -> Result<String>;

    /// Close the tab
    async fn close(self: Box<Self>) -> Result<()>;
}
