//! Chrome DevTools Protocol (CDP) client implementation.
//!
//! Connects to Chrome/Chromium via WebSocket and communicates using the CDP
//! JSON-RPC protocol.
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://127.0.0.1:9222").await?;
//! let page = client.new_page().await?;
//! page.navigate("https://example.com", Duration::from_secs(30)).await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::{CdpClient, DEFAULT_COMMAND_TIMEOUT};
pub use error::CdpError;
pub use protocol::*;
pub use session::{NetworkTracker, PageSession};
