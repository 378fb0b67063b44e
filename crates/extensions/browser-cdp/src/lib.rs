//! Chrome DevTools Protocol backend for revscout.
//!
//! Implements the browser capability traits from `revscout-protocols` on top
//! of a pure Rust CDP client.
//!
//! ```text
//! ┌─────────────────┐    WebSocket     ┌──────────────────┐
//! │  Rust Backend   │ ◄──────────────► │  Chrome/Chromium │
//! │  (this crate)   │       CDP        │   (headless)     │
//! └─────────────────┘                  └──────────────────┘
//! ```
//!
//! [`ChromeLauncher`] reuses a Chrome already listening on the configured
//! debug port, or launches a headless one with a throwaway profile and
//! shuts it down again when the session is closed.

pub mod cdp;
mod launcher;
mod page;

pub use cdp::{CdpClient, CdpError, NetworkTracker, PageSession};
pub use launcher::{ChromeLauncher, ChromeLauncherConfig, ChromeSession};
pub use page::{CdpElement, CdpPage};
