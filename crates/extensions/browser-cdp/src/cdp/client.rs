//! CDP WebSocket client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, RwLock};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, trace, warn};

use super::error::CdpError;
use super::protocol::{BrowserVersion, CdpRequest, Inbound, PageEvent, Routed};
use super::session::PageSession;

/// Default bound for a single CDP command round trip.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;
type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value, CdpError>>>>>;
type EventHandlers = Arc<RwLock<HashMap<String, mpsc::UnboundedSender<PageEvent>>>>;

/// Shared command path used by the client and every page session.
#[derive(Clone)]
pub(crate) struct CommandChannel {
    ws_tx: Arc<tokio::sync::Mutex<WsSink>>,
    pending: PendingMap,
    request_id: Arc<AtomicU64>,
    timeout: Duration,
}

impl CommandChannel {
    /// Send a CDP command and wait for its response.
    pub(crate) async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(|s| s.to_string()),
        };

        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        {
            let mut ws = self.ws_tx.lock().await;
            if let Err(e) = ws.send(Message::Text(json.into())).await {
                self.pending.lock().remove(&id);
                return Err(e.into());
            }
        }

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!(
                    "{} did not answer within {:?}",
                    method, self.timeout
                )))
            }
        }
    }
}

/// CDP client for browser automation.
///
/// Connects to Chrome via WebSocket and provides methods for browser control.
pub struct CdpClient {
    browser_ws_url: String,
    channel: CommandChannel,
    event_handlers: EventHandlers,
    _recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to Chrome at the given endpoint (e.g. `http://127.0.0.1:9222`).
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        Self::connect_with_timeout(endpoint, DEFAULT_COMMAND_TIMEOUT).await
    }

    /// Connect with an explicit per-command timeout.
    pub async fn connect_with_timeout(
        endpoint: &str,
        command_timeout: Duration,
    ) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/');

        let version = Self::browser_version(http_endpoint).await?;
        debug!("Connected to browser: {}", version.browser);

        let browser_ws_url = version.web_socket_debugger_url;

        let (ws_stream, _) = tokio_tungstenite::connect_async(&browser_ws_url)
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;

        let (ws_sink, ws_source) = ws_stream.split();
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let event_handlers: EventHandlers = Arc::new(RwLock::new(HashMap::new()));

        let recv_task = {
            let pending = pending.clone();
            let event_handlers = event_handlers.clone();
            tokio::spawn(async move {
                Self::receive_loop(ws_source, pending, event_handlers).await;
            })
        };

        debug!("CDP client connected to {}", browser_ws_url);

        Ok(Self {
            browser_ws_url,
            channel: CommandChannel {
                ws_tx: Arc::new(tokio::sync::Mutex::new(ws_sink)),
                pending,
                request_id: Arc::new(AtomicU64::new(1)),
                timeout: command_timeout,
            },
            event_handlers,
            _recv_task: recv_task,
        })
    }

    /// Fetch `/json/version` from a debugging endpoint.
    pub async fn browser_version(endpoint: &str) -> Result<BrowserVersion, CdpError> {
        let version_url = format!("{}/json/version", endpoint.trim_end_matches('/'));
        debug!("Fetching browser version from {}", version_url);

        reqwest::get(&version_url)
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?
            .json()
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))
    }

    /// WebSocket receive loop.
    async fn receive_loop(mut ws_source: WsSource, pending: PendingMap, event_handlers: EventHandlers) {
        while let Some(msg) = ws_source.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    trace!("CDP recv: {}", text);
                    match serde_json::from_str::<Inbound>(&text) {
                        Ok(frame) => Self::dispatch(frame, &pending, &event_handlers).await,
                        Err(e) => warn!("Failed to parse CDP message: {}", e),
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("WebSocket closed");
                    break;
                }
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }

        // Waiters observe SessionClosed once their senders are dropped.
        pending.lock().clear();
        event_handlers.write().await.clear();
    }

    async fn dispatch(frame: Inbound, pending: &PendingMap, event_handlers: &EventHandlers) {
        match frame.route() {
            Routed::Reply { id, result } => {
                let waiter = pending.lock().remove(&id);
                if let Some(tx) = waiter {
                    let _ = tx.send(result);
                }
            }
            Routed::Event { session_id, event } => {
                if let Some(tx) = event_handlers.read().await.get(&session_id) {
                    let _ = tx.send(event);
                }
            }
            Routed::Ignored => {}
        }
    }

    /// Send a browser-level CDP command.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.channel.call(method, params, None).await
    }

    /// Get browser WebSocket URL.
    pub fn browser_ws_url(&self) -> &str {
        &self.browser_ws_url
    }

    /// Create a blank page/tab and attach a session to it.
    pub async fn new_page(&self) -> Result<PageSession, CdpError> {
        let result = self
            .call("Target.createTarget", Some(json!({"url": "about:blank"})))
            .await?;
        let target_id = result["targetId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing targetId".to_string()))?
            .to_string();
        debug!("Created new page: {}", target_id);

        self.attach_page(&target_id).await
    }

    /// Attach to an existing page.
    pub async fn attach_page(&self, target_id: &str) -> Result<PageSession, CdpError> {
        let result = self
            .call(
                "Target.attachToTarget",
                Some(json!({
                    "targetId": target_id,
                    "flatten": true
                })),
            )
            .await?;

        let session_id = result["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing sessionId".to_string()))?
            .to_string();

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        self.event_handlers
            .write()
            .await
            .insert(session_id.clone(), event_tx);

        let session = PageSession::new(
            target_id.to_string(),
            session_id,
            self.channel.clone(),
            event_rx,
        );

        session.enable_domains().await?;

        Ok(session)
    }

    /// Close a page/target.
    pub async fn close_page(&self, target_id: &str) -> Result<(), CdpError> {
        self.call("Target.closeTarget", Some(json!({"targetId": target_id})))
            .await?;
        Ok(())
    }

    /// Ask the browser process to exit.
    pub async fn close_browser(&self) -> Result<(), CdpError> {
        self.call("Browser.close", None).await?;
        Ok(())
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self._recv_task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_unreachable_endpoint() {
        let result = CdpClient::connect("http://127.0.0.1:1").await;
        assert!(matches!(result, Err(CdpError::ChromeNotAvailable(_))));
    }

    #[tokio::test]
    async fn test_dispatch_routes_response_to_waiter() {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let handlers: EventHandlers = Arc::new(RwLock::new(HashMap::new()));
        let (tx, rx) = oneshot::channel();
        pending.lock().insert(5, tx);

        let frame: Inbound =
            serde_json::from_str(r#"{"id": 5, "result": {"ok": true}}"#).unwrap();
        CdpClient::dispatch(frame, &pending, &handlers).await;

        let value = rx.await.unwrap().unwrap();
        assert_eq!(value["ok"], true);
        assert!(pending.lock().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_routes_error_to_waiter() {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let handlers: EventHandlers = Arc::new(RwLock::new(HashMap::new()));
        let (tx, rx) = oneshot::channel();
        pending.lock().insert(9, tx);

        let frame: Inbound = serde_json::from_str(
            r#"{"id": 9, "error": {"code": -32000, "message": "No node with given id found"}}"#,
        )
        .unwrap();
        CdpClient::dispatch(frame, &pending, &handlers).await;

        match rx.await.unwrap() {
            Err(CdpError::Protocol { code, .. }) => assert_eq!(code, -32000),
            other => panic!("Expected protocol error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dispatch_routes_event_to_session() {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let handlers: EventHandlers = Arc::new(RwLock::new(HashMap::new()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        handlers.write().await.insert("S1".to_string(), tx);

        let frame: Inbound = serde_json::from_str(
            r#"{"method": "Network.loadingFinished", "params": {"requestId": "1"}, "sessionId": "S1"}"#,
        )
        .unwrap();
        CdpClient::dispatch(frame, &pending, &handlers).await;

        let event = rx.recv().await.unwrap();
        assert_eq!(event.method, "Network.loadingFinished");
        assert_eq!(event.params["requestId"], "1");
    }
}
