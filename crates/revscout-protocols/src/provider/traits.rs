//! LLM Provider trait definition.

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse};
use crate::error::ProviderError;

/// Core trait for inference providers.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Returns the provider ID.
    fn id(&self) -> &str;

    /// Generate a completion (non-streaming).
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError>;
}
