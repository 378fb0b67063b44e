//! Browser capability traits.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::BrowserError;

/// Acquires fresh browser sessions.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError>;
}

/// A running browser.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Open a new page/tab.
    async fn new_page(&self) -> Result<Box<dyn PageHandle>, BrowserError>;

    /// Release the session and every page it opened.
    async fn close(&self) -> Result<(), BrowserError>;
}

/// A single page/tab.
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Navigate and wait for the document to load, bounded by `timeout`.
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), BrowserError>;

    /// Wait until no network requests are in flight, bounded by `timeout`.
    async fn wait_for_network_idle(&self, timeout: Duration) -> Result<(), BrowserError>;

    /// Current rendered markup.
    async fn content(&self) -> Result<String, BrowserError>;

    /// All elements matching `locator`, in document order.
    async fn query_all(&self, locator: &str) -> Result<Vec<Box<dyn ElementHandle>>, BrowserError>;

    /// First element matching `locator`.
    async fn query(&self, locator: &str) -> Result<Option<Box<dyn ElementHandle>>, BrowserError>;

    /// Free the browser-side references behind every element handle handed
    /// out so far. Those handles must not be used afterwards.
    async fn release_elements(&self) -> Result<(), BrowserError>;
}

/// A live reference to one element of a page.
#[async_trait]
pub trait ElementHandle: Send + Sync {
    /// First descendant matching `locator`.
    async fn query(&self, locator: &str) -> Result<Option<Box<dyn ElementHandle>>, BrowserError>;

    /// `textContent` of the element, `None` when the DOM reports null.
    async fn text_content(&self) -> Result<Option<String>, BrowserError>;

    async fn click(&self) -> Result<(), BrowserError>;

    async fn is_visible(&self) -> Result<bool, BrowserError>;
}
