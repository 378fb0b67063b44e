//! Chat completions wire format.

use serde::{Deserialize, Serialize};

/// Body of `POST /chat/completions`, borrowing from the request it came from.
#[derive(Debug, Serialize)]
pub struct ChatBody<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatTurn<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<FormatSpec>,
}

#[derive(Debug, Serialize)]
pub struct ChatTurn<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// `{"type": "json_object"}`
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormatSpec {
    JsonObject,
}

/// Reply body. Only the first choice is ever read.
#[derive(Debug, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<ReplyChoice>,
    pub usage: Option<TokenCounts>,
}

#[derive(Debug, Deserialize)]
pub struct ReplyChoice {
    pub message: ReplyMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplyMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TokenCounts {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
