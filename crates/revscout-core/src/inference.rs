//! Locator schema inference from raw page markup.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error};

use revscout_protocols::error::{ProviderError, SchemaInferenceError};
use revscout_protocols::provider::{CompletionRequest, LLMProvider, ResponseFormat};
use revscout_protocols::types::{LocatorSchema, Message};

/// Configuration for locator inference.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Model to ask.
    pub model: String,
    /// Characters of markup included in the request.
    pub markup_sample_chars: usize,
    /// Bound for the whole inference round trip.
    pub timeout: Duration,
    /// Maximum tokens for the reply.
    pub max_tokens: Option<u32>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            markup_sample_chars: 2000,
            timeout: Duration::from_secs(30),
            max_tokens: Some(512),
        }
    }
}

/// Asks an inference service for the six locators of a review page.
pub struct SchemaInferrer {
    provider: Arc<dyn LLMProvider>,
    config: InferenceConfig,
}

impl SchemaInferrer {
    pub fn new(provider: Arc<dyn LLMProvider>, config: InferenceConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Infer a locator schema from page markup. Exactly one provider call.
    pub async fn infer_schema(&self, markup: &str) -> Result<LocatorSchema, SchemaInferenceError> {
        let sample = truncate_markup(markup, self.config.markup_sample_chars);
        let timeout_secs = self.config.timeout.as_secs();

        let mut request =
            CompletionRequest::new(self.config.model.clone(), vec![Message::user(build_prompt(sample))])
                .with_temperature(0.0)
                .with_response_format(ResponseFormat::JsonObject)
                .with_timeout_seconds(timeout_secs);
        if let Some(max_tokens) = self.config.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        debug!(
            provider = self.provider.id(),
            model = %self.config.model,
            sample_chars = sample.chars().count(),
            "Requesting locator schema"
        );

        let response =
            match tokio::time::timeout(self.config.timeout, self.provider.complete(request)).await {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => {
                    error!(error = %e, "Locator inference request failed");
                    return Err(e.into());
                }
                Err(_) => {
                    error!(timeout_secs, "Locator inference timed out");
                    return Err(ProviderError::Timeout(timeout_secs).into());
                }
            };

        parse_schema_reply(response.text()).inspect_err(|e| {
            error!(error = %e, reply = response.text(), "Rejected locator inference reply");
        })
    }
}

/// Prefix of `markup` holding at most `max_chars` characters.
pub fn truncate_markup(markup: &str, max_chars: usize) -> &str {
    match markup.char_indices().nth(max_chars) {
        Some((idx, _)) => &markup[..idx],
        None => markup,
    }
}

/// Instruction sent to the inference service.
pub fn build_prompt(sample: &str) -> String {
    format!(
        "Analyze the HTML below and return CSS selectors for the elements of a product review.\n\
         \n\
         HTML: {sample}...\n\
         \n\
         Reply with a single JSON object and nothing else, using exactly these keys:\n\
         - review_container: the element wrapping one review\n\
         - title: the review title, relative to the container\n\
         - body: the review text, relative to the container\n\
         - rating: the element showing the rating, relative to the container\n\
         - reviewer: the reviewer name, relative to the container\n\
         - next_page: the button or link that opens the next page of reviews"
    )
}

/// Parse an inference reply into a validated schema.
///
/// Accepts a bare JSON object or one wrapped in a Markdown code fence.
pub fn parse_schema_reply(reply: &str) -> Result<LocatorSchema, SchemaInferenceError> {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return Err(SchemaInferenceError::EmptyReply);
    }

    let value: Value = serde_json::from_str(strip_code_fence(trimmed))
        .map_err(|e| SchemaInferenceError::Malformed(e.to_string()))?;
    LocatorSchema::from_reply_value(&value)
}

fn strip_code_fence(reply: &str) -> &str {
    let Some(inner) = reply.strip_prefix("```") else {
        return reply;
    };
    let inner = inner
        .strip_prefix("json")
        .or_else(|| inner.strip_prefix("JSON"))
        .unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
#[path = "inference_tests.rs"]
mod tests;
