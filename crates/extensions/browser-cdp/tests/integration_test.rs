//! Integration tests against a real Chrome.
//!
//! Run with `cargo test -p revscout-browser-cdp -- --ignored` on a machine
//! with Chrome or Chromium installed.

use std::time::Duration;

use revscout_browser_cdp::{ChromeLauncher, ChromeLauncherConfig};
use revscout_protocols::browser::BrowserLauncher;

const TIMEOUT: Duration = Duration::from_secs(30);

const REVIEWS_PAGE: &str = "data:text/html,\
<div class='review'><h3>Great</h3><p>Loved it</p><span class='stars'>4.5 stars</span></div>\
<div class='review'><h3>Meh</h3><p>It was fine</p></div>\
<a class='next' style='display:none' href='#'>Next</a>";

fn launcher() -> ChromeLauncher {
    ChromeLauncher::new(ChromeLauncherConfig {
        debug_port: 9333,
        ..Default::default()
    })
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_query_and_read_reviews() {
    let session = launcher().launch().await.unwrap();
    let page = session.new_page().await.unwrap();

    page.goto(REVIEWS_PAGE, TIMEOUT).await.unwrap();
    page.wait_for_network_idle(TIMEOUT).await.unwrap();

    let reviews = page.query_all("div.review").await.unwrap();
    assert_eq!(reviews.len(), 2);

    let title = reviews[0].query("h3").await.unwrap().unwrap();
    assert_eq!(title.text_content().await.unwrap().as_deref(), Some("Great"));
    assert!(reviews[1].query(".stars").await.unwrap().is_none());

    let next = page.query("a.next").await.unwrap().unwrap();
    assert!(!next.is_visible().await.unwrap());

    assert!(page.content().await.unwrap().contains("Loved it"));

    session.close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_invalid_selector_is_reported() {
    let session = launcher().launch().await.unwrap();
    let page = session.new_page().await.unwrap();
    page.goto(REVIEWS_PAGE, TIMEOUT).await.unwrap();

    let result = page.query_all("div[").await;
    assert!(matches!(
        result,
        Err(revscout_protocols::BrowserError::InvalidLocator { .. })
    ));

    session.close().await.unwrap();
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_unresolvable_host_fails_navigation() {
    let session = launcher().launch().await.unwrap();
    let page = session.new_page().await.unwrap();

    let result = page.goto("http://revscout.invalid/", TIMEOUT).await;
    assert!(result.is_err());

    session.close().await.unwrap();
}
