use influence_browser::{ChromiumLauncher, SessionLauncher};
use influence_core::BrowserConfig;
use std::time::Duration;

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_session_acquire_and_release() {
    let launcher = ChromiumLauncher::new(BrowserConfig::default());
    let session = launcher.acquire().await.expect("launch browser");
    session.release().await.expect("release browser");
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_open_and_read_page() {
    let launcher = ChromiumLauncher::new(BrowserConfig::default());
    let session = launcher.acquire().await.expect("launch browser");

    let page = session
        .open("https://example.com", Duration::from_secs(60))
        .await
        .expect("open page");
    page.wait_for_selector("h1", Duration::from_secs(10))
        .await
        .expect("heading present");

    let text = page.visible_text().await.expect("read body text");
    assert!(text.contains("Example Domain"));

    page.close().await.expect("close page");
    session.release().await.expect("release browser");
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_missing_selector_times_out() {
    let launcher = ChromiumLauncher::new(BrowserConfig::default());
    let session = launcher.acquire().await.expect("launch browser");

    let page = session
        .open("https://example.com", Duration::from_secs(60))
        .await
        .expect("open page");
    let err = page
        .wait_for_selector("main.never-there", Duration::from_secs(1))
        .await
        .expect_err("selector should time out");
    assert!(err.is_timeout());

    page.close().await.expect("close page");
    session.release().await.expect("release browser");
}
