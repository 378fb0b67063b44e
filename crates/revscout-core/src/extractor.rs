//! Per-container field extraction.
//!
//! Every field is looked up independently. A missing or broken field
//! collapses to its default and never aborts the record.

use std::time::Duration;

use tracing::warn;

use revscout_protocols::browser::ElementHandle;
use revscout_protocols::types::{LocatorKey, LocatorSchema, ReviewRecord};

use crate::error::FieldLookupError;
use crate::rating::parse_rating;

/// Result of looking up one field inside a review container.
#[derive(Debug)]
pub enum FieldLookup {
    /// The locator matched and its text was read.
    Found(String),
    /// The locator matched nothing, or the text was null.
    Absent,
    /// The query or text read failed.
    Failed(FieldLookupError),
}

impl FieldLookup {
    /// Look up `locator` under `element` and read its text, bounded by `timeout`.
    pub async fn text_of(element: &dyn ElementHandle, locator: &str, timeout: Duration) -> Self {
        let lookup = async {
            let found = element.query(locator).await.map_err(FieldLookupError::Query)?;
            match found {
                Some(child) => child.text_content().await.map_err(FieldLookupError::Text),
                None => Ok(None),
            }
        };

        match tokio::time::timeout(timeout, lookup).await {
            Ok(Ok(Some(text))) => FieldLookup::Found(text),
            Ok(Ok(None)) => FieldLookup::Absent,
            Ok(Err(e)) => FieldLookup::Failed(e),
            Err(_) => FieldLookup::Failed(FieldLookupError::Timeout {
                timeout_secs: timeout.as_secs(),
            }),
        }
    }

    /// Trimmed text, empty when absent or failed.
    pub fn into_text(self, key: LocatorKey) -> String {
        match self {
            FieldLookup::Found(text) => text.trim().to_string(),
            FieldLookup::Absent => String::new(),
            FieldLookup::Failed(e) => {
                warn!(field = %key, error = %e, "Field lookup failed, using default");
                String::new()
            }
        }
    }

    /// Parsed rating, `0.0` when absent, failed or unparseable.
    pub fn into_rating(self, key: LocatorKey) -> f64 {
        parse_rating(&self.into_text(key))
    }
}

/// Builds [`ReviewRecord`]s from review containers.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    timeout: Duration,
}

impl FieldExtractor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Extract the four fields of one container. Never fails.
    pub async fn extract_record(
        &self,
        element: &dyn ElementHandle,
        schema: &LocatorSchema,
    ) -> ReviewRecord {
        let (title, body, rating, reviewer) = tokio::join!(
            FieldLookup::text_of(element, schema.title(), self.timeout),
            FieldLookup::text_of(element, schema.body(), self.timeout),
            FieldLookup::text_of(element, schema.rating(), self.timeout),
            FieldLookup::text_of(element, schema.reviewer(), self.timeout),
        );

        ReviewRecord {
            title: title.into_text(LocatorKey::Title),
            body: body.into_text(LocatorKey::Body),
            rating: rating.into_rating(LocatorKey::Rating),
            reviewer: reviewer.into_text(LocatorKey::Reviewer),
        }
    }
}

#[cfg(test)]
#[path = "extractor_tests.rs"]
mod tests;
