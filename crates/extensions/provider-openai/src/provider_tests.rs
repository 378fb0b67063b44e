use super::*;
use revscout_protocols::provider::ResponseFormat;
use revscout_protocols::types::Message;

#[test]
fn test_provider_id() {
    let provider = OpenAIProvider::new("test-key".to_string());
    assert_eq!(provider.id(), "openai");
}

#[test]
fn test_custom_url() {
    let provider = OpenAIProvider::with_url(
        "test-key".to_string(),
        "https://custom.api/v1".to_string(),
    );
    assert_eq!(provider.api_url, "https://custom.api/v1");
}

#[test]
fn test_provider_default_url() {
    let provider = OpenAIProvider::new("key".to_string());
    assert_eq!(provider.api_url, DEFAULT_API_URL);
}

// Wiremock-based tests for actual HTTP calls
mod http_tests {
    use super::*;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    fn ok_body(content: &str) -> String {
        serde_json::json!({
            "id": "chatcmpl-123",
            "model": "gpt-3.5-turbo",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        })
        .to_string()
    }

    fn schema_request() -> CompletionRequest {
        CompletionRequest::new("gpt-3.5-turbo", vec![Message::user("<html></html>")])
            .with_temperature(0.0)
            .with_response_format(ResponseFormat::JsonObject)
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/"))
            .and(matchers::header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ok_body("{\"title\": \"h3\"}")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = OpenAIProvider::with_url("test-key".to_string(), mock_server.uri());
        let response = provider.complete(schema_request()).await.unwrap();
        assert_eq!(response.text(), "{\"title\": \"h3\"}");
        assert_eq!(response.usage.total_tokens, 15);
    }

    #[tokio::test]
    async fn test_complete_sends_json_mode_and_zero_temperature() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::body_partial_json(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "temperature": 0.0,
                "response_format": {"type": "json_object"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(ok_body("{}")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = OpenAIProvider::with_url("test-key".to_string(), mock_server.uri());
        assert!(provider.complete(schema_request()).await.is_ok());
    }

    #[tokio::test]
    async fn test_complete_auth_error() {
        let mock_server = MockServer::start().await;

        let error_body = r#"{"error": {"message": "Invalid API key", "type": "invalid_request_error"}}"#;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string(error_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = OpenAIProvider::with_url("bad-key".to_string(), mock_server.uri());
        match provider.complete(schema_request()).await.unwrap_err() {
            ProviderError::AuthenticationFailed(message) => {
                assert!(message.contains("Invalid API key"));
            }
            other => panic!("Expected AuthenticationFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_complete_rate_limit() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = OpenAIProvider::with_url("test-key".to_string(), mock_server.uri());
        let result = provider.complete(schema_request()).await;
        assert!(matches!(result, Err(ProviderError::RateLimited(_))));
    }

    #[tokio::test]
    async fn test_complete_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = OpenAIProvider::with_url("test-key".to_string(), mock_server.uri());
        match provider.complete(schema_request()).await.unwrap_err() {
            ProviderError::ApiError { status, message } => {
                assert_eq!(status, 500);
                assert!(message.contains("Internal Server Error"));
            }
            other => panic!("Expected ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_complete_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let provider = OpenAIProvider::with_url("test-key".to_string(), mock_server.uri());
        let result = provider.complete(schema_request()).await;
        assert!(matches!(result, Err(ProviderError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_complete_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(ok_body("{}"))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let provider = OpenAIProvider::with_url("test-key".to_string(), mock_server.uri());
        let result = provider.complete(schema_request().with_timeout_seconds(1)).await;
        assert!(matches!(result, Err(ProviderError::Timeout(1))));
    }

    #[tokio::test]
    async fn test_complete_unreachable() {
        let provider =
            OpenAIProvider::with_url("test-key".to_string(), "http://127.0.0.1:1".to_string());
        let result = provider.complete(schema_request()).await;
        assert!(matches!(result, Err(ProviderError::Network(_))));
    }
}
