//! OpenAI provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use revscout_protocols::error::ProviderError;
use revscout_protocols::provider::{CompletionRequest, CompletionResponse, LLMProvider};

use crate::api::{ChatBody, ChatReply};
use crate::converter::{convert_request, parse_response};

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI chat completions provider. Works with any compatible endpoint.
pub struct OpenAIProvider {
    api_key: String,
    api_url: String,
    client: reqwest::Client,
}

impl OpenAIProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_url(api_key, DEFAULT_API_URL.to_string())
    }

    /// Create provider with custom API URL (for OpenAI-compatible APIs).
    pub fn with_url(api_key: String, api_url: String) -> Self {
        Self {
            api_key,
            api_url,
            client: reqwest::Client::new(),
        }
    }

    async fn send_request(
        &self,
        body: &ChatBody<'_>,
        timeout_seconds: Option<u64>,
    ) -> Result<reqwest::Response, ProviderError> {
        let mut builder = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body);
        if let Some(secs) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let response = builder.send().await.map_err(|e| {
            match timeout_seconds {
                Some(secs) if e.is_timeout() => ProviderError::Timeout(secs),
                _ => ProviderError::Network(e.to_string()),
            }
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status, text));
        }

        Ok(response)
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    fn id(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let body = convert_request(&request);
        debug!(model = %body.model, url = %self.api_url, "Sending completion request");

        let response = self.send_request(&body, request.timeout_seconds).await?;
        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        parse_response(reply)
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
