//! Core session struct and CDP command dispatch.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::cdp::client::CommandChannel;
use crate::cdp::error::CdpError;
use crate::cdp::protocol::PageEvent;

use super::network::PageLifecycle;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A session attached to a single page/target.
pub struct PageSession {
    pub(super) target_id: String,
    pub(super) session_id: String,
    pub(super) channel: CommandChannel,
    pub(super) lifecycle: Arc<Mutex<PageLifecycle>>,
    event_task: tokio::task::JoinHandle<()>,
}

impl PageSession {
    pub(crate) fn new(
        target_id: String,
        session_id: String,
        channel: CommandChannel,
        event_rx: mpsc::UnboundedReceiver<PageEvent>,
    ) -> Self {
        let lifecycle = Arc::new(Mutex::new(PageLifecycle::default()));
        let event_task = tokio::spawn(Self::pump_events(event_rx, lifecycle.clone()));

        Self {
            target_id,
            session_id,
            channel,
            lifecycle,
            event_task,
        }
    }

    async fn pump_events(
        mut event_rx: mpsc::UnboundedReceiver<PageEvent>,
        lifecycle: Arc<Mutex<PageLifecycle>>,
    ) {
        while let Some(event) = event_rx.recv().await {
            trace!("CDP event: {}", event.method);
            lifecycle.lock().on_event(&event.method, &event.params);
        }
    }

    /// Get target ID.
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Get session ID.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.channel.call(method, params, Some(&self.session_id)).await
    }

    /// Enable required CDP domains.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("Runtime.enable", None).await?;
        self.call("Network.enable", None).await?;

        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    /// Get page HTML content.
    pub async fn get_content(&self) -> Result<String, CdpError> {
        let result = self.evaluate("document.documentElement.outerHTML").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    /// In-flight request count as seen by the network tracker.
    pub fn in_flight_requests(&self) -> usize {
        self.lifecycle.lock().network.in_flight()
    }

    /// Wait until no request has been in flight for `quiet`.
    pub async fn wait_for_network_idle(
        &self,
        quiet: Duration,
        timeout: Duration,
    ) -> Result<(), CdpError> {
        let start = Instant::now();

        loop {
            if self.lifecycle.lock().network.is_idle(quiet) {
                return Ok(());
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout(format!(
                    "network still busy after {:?} ({} requests in flight)",
                    timeout,
                    self.in_flight_requests()
                )));
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        self.event_task.abort();
    }
}
