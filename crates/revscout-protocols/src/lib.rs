//! # revscout Protocols
//!
//! Shared data types, error kinds and collaborator traits for revscout.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`LLMProvider`] - Request/response access to a semantic-inference service
//! - [`BrowserLauncher`] - Acquires a [`BrowserSession`]
//! - [`PageHandle`] / [`ElementHandle`] - Capabilities of a rendered page

pub mod browser;
pub mod error;
pub mod provider;
pub mod types;

pub use browser::{BrowserLauncher, BrowserSession, ElementHandle, PageHandle};
pub use error::{BrowserError, CrawlError, ProviderError, SchemaInferenceError};
pub use provider::{CompletionRequest, CompletionResponse, LLMProvider, ResponseFormat};
pub use types::*;
