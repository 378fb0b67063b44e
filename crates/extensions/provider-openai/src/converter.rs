//! Conversion between protocol types and the OpenAI wire format.

use revscout_protocols::error::ProviderError;
use revscout_protocols::provider::{CompletionRequest, CompletionResponse, ResponseFormat};
use revscout_protocols::types::{Message, StopReason, Usage};

use crate::api::{ChatBody, ChatReply, ChatTurn, FormatSpec};

/// Request body for a completion request.
pub fn convert_request(request: &CompletionRequest) -> ChatBody<'_> {
    ChatBody {
        model: &request.model,
        messages: convert_messages(&request.messages),
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        response_format: match request.response_format {
            ResponseFormat::Text => None,
            ResponseFormat::JsonObject => Some(FormatSpec::JsonObject),
        },
    }
}

pub fn convert_messages(messages: &[Message]) -> Vec<ChatTurn<'_>> {
    messages
        .iter()
        .map(|msg| ChatTurn {
            role: msg.role.as_str(),
            content: &msg.content,
        })
        .collect()
}

/// A reply without choices or with null content is an invalid response.
pub fn parse_response(response: ChatReply) -> Result<CompletionResponse, ProviderError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::InvalidResponse("response has no choices".to_string()))?;

    let content = choice.message.content.ok_or_else(|| {
        ProviderError::InvalidResponse("response message has no content".to_string())
    })?;

    let usage = response
        .usage
        .map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        })
        .unwrap_or_default();

    Ok(CompletionResponse {
        id: response.id,
        model: response.model,
        message: Message::assistant(content),
        stop_reason: convert_finish_reason(choice.finish_reason.as_deref()),
        usage,
    })
}

fn convert_finish_reason(reason: Option<&str>) -> StopReason {
    match reason {
        Some("length") => StopReason::MaxTokens,
        Some("content_filter") => StopReason::ContentFilter,
        _ => StopReason::EndTurn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ReplyChoice, ReplyMessage};

    fn api_response(content: Option<&str>, finish_reason: Option<&str>) -> ChatReply {
        ChatReply {
            id: "chatcmpl-1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            choices: vec![ReplyChoice {
                message: ReplyMessage {
                    content: content.map(str::to_string),
                },
                finish_reason: finish_reason.map(str::to_string),
            }],
            usage: None,
        }
    }

    #[test]
    fn test_convert_request_json_mode() {
        let request = CompletionRequest::new("gpt-3.5-turbo", vec![Message::user("hi")])
            .with_temperature(0.0)
            .with_response_format(ResponseFormat::JsonObject);
        let api = convert_request(&request);
        assert_eq!(api.temperature, Some(0.0));
        assert!(matches!(api.response_format, Some(FormatSpec::JsonObject)));
    }

    #[test]
    fn test_convert_request_text_mode_omits_format() {
        let request = CompletionRequest::new("gpt-3.5-turbo", vec![Message::user("hi")]);
        assert!(convert_request(&request).response_format.is_none());
    }

    #[test]
    fn test_convert_messages_roles() {
        let messages = vec![Message::system("rules"), Message::user("page")];
        let api = convert_messages(&messages);
        assert_eq!(api[0].role, "system");
        assert_eq!(api[1].role, "user");
        assert_eq!(api[1].content, "page");
    }

    #[test]
    fn test_parse_response_text() {
        let response = parse_response(api_response(Some("{}"), Some("stop"))).unwrap();
        assert_eq!(response.text(), "{}");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
    }

    #[test]
    fn test_parse_response_length_stop() {
        let response = parse_response(api_response(Some("{"), Some("length"))).unwrap();
        assert_eq!(response.stop_reason, StopReason::MaxTokens);
    }

    #[test]
    fn test_parse_response_null_content() {
        let err = parse_response(api_response(None, Some("content_filter"))).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[test]
    fn test_parse_response_no_choices() {
        let mut response = api_response(Some("x"), None);
        response.choices.clear();
        assert!(matches!(
            parse_response(response),
            Err(ProviderError::InvalidResponse(_))
        ));
    }
}
