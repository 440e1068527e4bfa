use crate::actions::BrowserPage;
use crate::error::{BrowserError, Result};
use crate::fingerprint::FingerprintConfig;
use chromiumoxide::cdp::browser_protocol::emulation::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{Headers, SetExtraHttpHeadersParams};
use chromiumoxide::Page;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};

/// Interval between DOM polls while waiting on a condition
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Consecutive unchanged polls that count as network idle
const IDLE_POLLS: u32 = 2;

const RESOURCE_COUNT_JS: &str = "document.readyState === 'complete' ? performance.getEntriesByType('resource').length : -1";
const BODY_TEXT_JS: &str = "document.body ? document.body.innerText : ''";

/// A Chromium tab
pub struct ChromiumPage {
    page: Page,
    url: String,
}

impl ChromiumPage {
    pub fn new(page: Page, url: impl Into<String>) -> Self {
        Self {
            page,
            url: url.into(),
        }
    }

    /// Apply the user agent, accept-language and accept headers to this tab
    pub async fn apply_fingerprint(&self, fingerprint: &FingerprintConfig) -> Result<()> {
        let user_agent = SetUserAgentOverrideParams::builder()
            .user_agent(fingerprint.user_agent.clone())
            .accept_language(fingerprint.accept_language.clone())
            .build()
            .map_err(BrowserError::Page)?;

        self.page
            .execute(user_agent)
            .await
            .map_err(|e| BrowserError::Page(format!("failed to set user agent: {e}")))?;

        self.page
            .execute(SetExtraHttpHeadersParams::new(Headers::new(
                fingerprint.headers(),
            )))
            .await
            .map_err(|e| BrowserError::Page(format!("failed to set headers: {e}")))?;

        Ok(())
    }

    /// Navigate to the page URL, bounded by `limit`
    pub async fn navigate(&self, limit: Duration) -> Result<()> {
        tracing::debug!(url = %self.url, "Navigating");

        match timeout(limit, self.page.goto(self.url.as_str())).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::Navigation(format!("{}: {e}", self.url))),
            Err(_) => Err(BrowserError::Timeout(format!(
                "navigation to {} exceeded {limit:?}",
                self.url
            ))),
        }
    }

    async fn resource_count(&self) -> Result<i64> {
        self.page
            .evaluate(RESOURCE_COUNT_JS)
            .await
            .map_err(|e| BrowserError::Evaluation(e.to_string()))?
            .into_value::<i64>()
            .map_err(|e| BrowserError::Evaluation(e.to_string()))
    }
}

#[async_trait::async_trait]
impl BrowserPage for ChromiumPage {
    fn url(&self) -> &str {
        &self.url
    }

    async fn wait_for_network_idle(&self, limit: Duration) -> Result<()> {
        let deadline = Instant::now() + limit;
        let mut last = -1;
        let mut stable = 0;

        while Instant::now() < deadline {
            let count = self.resource_count().await?;
            if count >= 0 && count == last {
                stable += 1;
                if stable >= IDLE_POLLS {
                    return Ok(());
                }
            } else {
                stable = 0;
            }
            last = count;
            sleep(POLL_INTERVAL).await;
        }

        Err(BrowserError::Timeout(format!(
            "network did not settle on {} within {limit:?}",
            self.url
        )))
    }

    async fn wait_for_selector(&self, selector: &str, limit: Duration) -> Result<()> {
        let deadline = Instant::now() + limit;

        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout(format!(
                    "selector '{selector}' did not appear on {} within {limit:?}",
                    self.url
                )));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn content(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::Page(format!("failed to read content: {e}")))
    }

    async fn visible_text(&self) -> Result<String> {
        self.page
            .evaluate(BODY_TEXT_JS)
            .await
            .map_err(|e| BrowserError::Evaluation(e.to_string()))?
            .into_value::<String>()
            .map_err(|e| BrowserError::Evaluation(e.to_string()))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let Self { page, url } = *self;
        page.close()
            .await
            .map_err(|e| BrowserError::Page(format!("failed to close tab {url}: {e}")))
    }
}
