use crate::actions::{BrowserPage, BrowserSession, SessionLauncher};
use crate::error::{BrowserError, Result};
use crate::fingerprint::FingerprintConfig;
use crate::page::ChromiumPage;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromiumConfig};
use chromiumoxide::handler::viewport::Viewport;
use futures::stream::StreamExt;
use influence_core::BrowserConfig;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Flags for running Chromium on constrained or containerized hosts
const HARDENED_ARGS: &[&str] = &[
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--no-first-run",
    "--disable-extensions",
    "--disable-features=site-per-process",
];

/// Launches one Chromium process per acquired session
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    settings: BrowserConfig,
}

impl ChromiumLauncher {
    pub fn new(settings: BrowserConfig) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl SessionLauncher for ChromiumLauncher {
    async fn acquire(&self) -> Result<Box<dyn BrowserSession>> {
        let session = ChromiumSession::launch(&self.settings).await?;
        Ok(Box::new(session))
    }
}

/// A running Chromium process and its CDP event loop
pub struct ChromiumSession {
    browser: Browser,
    handler: JoinHandle<()>,
    fingerprint: FingerprintConfig,
}

impl ChromiumSession {
    /// Launch Chromium with the hardened flag set and the configured identity
    pub async fn launch(settings: &BrowserConfig) -> Result<Self> {
        let fingerprint = FingerprintConfig::from_config(settings);
        let config = build_config(settings, &fingerprint)?;

        tracing::info!(
            headless = settings.headless,
            executable = ?settings.executable_path,
            "Launching browser"
        );

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("Browser handler event error: {}", e);
                }
            }
        });

        tracing::debug!("Browser launched");

        Ok(Self {
            browser,
            handler,
            fingerprint,
        })
    }
}

fn build_config(settings: &BrowserConfig, fingerprint: &FingerprintConfig) -> Result<ChromiumConfig> {
    let timeout = settings.navigation_timeout();

    let mut builder = ChromiumConfig::builder()
        .no_sandbox()
        .args(HARDENED_ARGS.iter().copied())
        .window_size(settings.window_width, settings.window_height)
        .viewport(Viewport {
            width: fingerprint.viewport_width,
            height: fingerprint.viewport_height,
            ..Viewport::default()
        })
        .request_timeout(timeout);

    if !settings.headless {
        builder = builder.with_head();
    }

    if let Some(path) = &settings.executable_path {
        builder = builder.chrome_executable(path);
    }

    builder.build().map_err(BrowserError::Launch)
}

#[async_trait::async_trait]
impl BrowserSession for ChromiumSession {
    async fn open(&self, url: &str, timeout: Duration) -> Result<Box<dyn BrowserPage>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::Page(format!("failed to open tab: {e}")))?;

        let page = ChromiumPage::new(page, url);

        if let Err(e) = page.apply_fingerprint(&self.fingerprint).await {
            close_quietly(page).await;
            return Err(e);
        }

        if let Err(e) = page.navigate(timeout).await {
            close_quietly(page).await;
            return Err(e);
        }

        Ok(Box::new(page))
    }

    async fn release(self: Box<Self>) -> Result<()> {
        let Self {
            mut browser,
            handler,
            ..
        } = *self;

        let closed = browser
            .close()
            .await
            .map_err(|e| BrowserError::Page(format!("failed to close browser: {e}")));

        if let Err(e) = browser.wait().await {
            tracing::debug!("Browser process wait failed: {}", e);
        }
        handler.abort();

        closed.map(|_| {
            tracing::debug!("Browser closed");
        })
    }
}

async fn close_quietly(page: ChromiumPage) {
    let url = page.url().to_string();
    if let Err(e) = Box::new(page).close().await {
        tracing::debug!(url = %url, "Tab close after failed open: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardened_args() {
        assert!(HARDENED_ARGS.contains(&"--disable-dev-shm-usage"));
        assert!(HARDENED_ARGS.contains(&"--disable-setuid-sandbox"));
        assert!(HARDENED_ARGS.iter().all(|arg| arg.starts_with("--")));
    }
}
