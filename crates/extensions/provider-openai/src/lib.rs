//! OpenAI-compatible inference provider for revscout.

mod api;
mod converter;
mod provider;

pub use provider::{OpenAIProvider, DEFAULT_API_URL};
