//! Navigation operations for CDP page session.

use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Navigate to URL and wait for the new document, bounded by `timeout`.
    pub async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), CdpError> {
        tokio::time::timeout(timeout, self.navigate_and_wait(url))
            .await
            .map_err(|_| CdpError::Timeout(format!("navigation to {} exceeded {:?}", url, timeout)))?
    }

    async fn navigate_and_wait(&self, url: &str) -> Result<(), CdpError> {
        let loads_before = self.lifecycle.lock().dom_content_loaded();
        self.lifecycle.lock().network.reset();

        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText").and_then(Value::as_str) {
            return Err(CdpError::NavigationFailed(format!("{}: {}", url, error)));
        }

        // Same-document navigations carry no loader and fire no load events.
        if result.get("loaderId").is_none() {
            debug!("Same-document navigation to {}", url);
            return Ok(());
        }

        self.wait_for_load(loads_before).await?;

        debug!("Navigated to {}", url);
        Ok(())
    }

    /// Wait until a document newer than `loads_before` is parsed.
    pub async fn wait_for_load(&self, loads_before: u64) -> Result<(), CdpError> {
        loop {
            if self.lifecycle.lock().dom_content_loaded() > loads_before {
                let state = self.evaluate("document.readyState").await?;
                if matches!(state.as_str(), Some("interactive" | "complete")) {
                    return Ok(());
                }
            }

            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}
