//! # revscout Core
//!
//! The review extraction engine. Given a product page with an unknown
//! layout it:
//!
//! 1. asks an inference service for six element locators
//!    ([`SchemaInferrer`]),
//! 2. extracts one [`ReviewRecord`] per review container, absorbing missing
//!    or broken fields ([`FieldExtractor`]),
//! 3. walks "next page" controls until none is left ([`ReviewCrawler`]).
//!
//! [`ReviewRecord`]: revscout_protocols::types::ReviewRecord

pub mod engine;
pub mod error;
pub mod extractor;
pub mod inference;
pub mod rating;
pub mod session;
pub mod summary;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use engine::{CrawlSettings, ProgressFn, ReviewCrawler};
pub use error::{FieldLookupError, PageTransitionError};
pub use extractor::{FieldExtractor, FieldLookup};
pub use inference::{InferenceConfig, SchemaInferrer};
pub use rating::parse_rating;
pub use session::{CrawlSession, CrawlState};
pub use summary::ReviewSummary;
