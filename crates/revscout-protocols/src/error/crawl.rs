//! Crawl-level errors surfaced to the caller.

use thiserror::Error;

use super::{BrowserError, ProviderError};

/// Locator schema inference failures.
#[derive(Debug, Error)]
pub enum SchemaInferenceError {
    #[error("Inference service unreachable: {0}")]
    Unreachable(#[from] ProviderError),

    #[error("Inference service returned an empty reply")]
    EmptyReply,

    #[error("Malformed inference reply: {0}")]
    Malformed(String),

    #[error("Inference reply is missing locators: {}", keys.join(", "))]
    MissingLocators { keys: Vec<&'static str> },

    #[error("Inference reply has an empty locator for '{key}'")]
    EmptyLocator { key: &'static str },
}

/// Errors that abort a crawl before any records are returned.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Invalid target URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Failed to acquire browser session: {0}")]
    Launch(#[source] BrowserError),

    #[error("Initial navigation to {url} exceeded {timeout_secs}s")]
    NavigationTimeout { url: String, timeout_secs: u64 },

    #[error("Initial navigation to {url} failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: BrowserError,
    },

    #[error("Failed to capture page markup: {0}")]
    MarkupCapture(#[source] BrowserError),

    #[error("Schema inference failed: {0}")]
    SchemaInference(#[from] SchemaInferenceError),

    #[error("Crawl cancelled")]
    Cancelled,
}
