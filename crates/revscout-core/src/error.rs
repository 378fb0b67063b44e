//! Engine-internal error kinds. Neither escapes a crawl as an error.

use revscout_protocols::error::BrowserError;
use thiserror::Error;

/// Why a single field lookup inside a review container failed.
///
/// Always collapsed to the field default by [`crate::FieldLookup`].
#[derive(Debug, Error)]
pub enum FieldLookupError {
    #[error("locator query failed: {0}")]
    Query(#[source] BrowserError),

    #[error("reading text content failed: {0}")]
    Text(#[source] BrowserError),

    #[error("lookup exceeded {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

/// Why moving from one result page to the next failed.
///
/// Ends the crawl with partial results.
#[derive(Debug, Error)]
pub enum PageTransitionError {
    #[error("clicking the next-page control failed: {0}")]
    Click(#[source] BrowserError),

    #[error("waiting for the next page to settle failed: {0}")]
    Settle(#[source] BrowserError),

    #[error("{step} exceeded {timeout_secs}s")]
    Timeout {
        step: &'static str,
        timeout_secs: u64,
    },
}
