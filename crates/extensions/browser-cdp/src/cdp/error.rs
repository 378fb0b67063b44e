//! CDP error types.

use revscout_protocols::error::BrowserError;
use thiserror::Error;

/// CDP client errors.
#[derive(Debug, Error)]
pub enum CdpError {
    /// Failed to connect to Chrome.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Chrome not found or not running with remote debugging.
    #[error("Chrome not available at {0}")]
    ChromeNotAvailable(String),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// CDP protocol error.
    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error (for endpoint discovery).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Navigation failed.
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// JavaScript execution error.
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    /// Timeout.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Session closed.
    #[error("Session closed")]
    SessionClosed,

    /// Invalid response.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CdpError {
    /// Whether the error reports a remote object or execution context that
    /// no longer exists.
    pub fn is_stale_reference(&self) -> bool {
        match self {
            CdpError::Protocol { message, .. } => {
                message.contains("Could not find object")
                    || message.contains("Cannot find context")
                    || message.contains("Execution context was destroyed")
            }
            CdpError::JavaScript(message) => message.contains("Execution context was destroyed"),
            _ => false,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}

impl From<url::ParseError> for CdpError {
    fn from(e: url::ParseError) -> Self {
        CdpError::ConnectionFailed(format!("Invalid URL: {}", e))
    }
}

impl From<CdpError> for BrowserError {
    fn from(e: CdpError) -> Self {
        if e.is_stale_reference() {
            return BrowserError::StaleElement(e.to_string());
        }
        match e {
            CdpError::ConnectionFailed(msg)
            | CdpError::ChromeNotAvailable(msg)
            | CdpError::WebSocket(msg)
            | CdpError::Http(msg) => BrowserError::ConnectionFailed(msg),
            CdpError::NavigationFailed(msg) => BrowserError::NavigationFailed(msg),
            CdpError::JavaScript(msg) => BrowserError::ActionFailed(format!("JS error: {}", msg)),
            CdpError::Timeout(msg) => BrowserError::Timeout(msg),
            CdpError::SessionClosed => BrowserError::SessionClosed,
            _ => BrowserError::ActionFailed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_maps_to_browser_timeout() {
        let err: BrowserError = CdpError::Timeout("Page.navigate".to_string()).into();
        assert!(err.is_timeout());
    }

    #[test]
    fn test_missing_object_is_stale() {
        let err = CdpError::Protocol {
            code: -32000,
            message: "Could not find object with given id".to_string(),
        };
        assert!(err.is_stale_reference());
        assert!(matches!(BrowserError::from(err), BrowserError::StaleElement(_)));
    }

    #[test]
    fn test_other_protocol_error_is_action_failure() {
        let err = CdpError::Protocol {
            code: -32601,
            message: "'Foo.bar' wasn't found".to_string(),
        };
        assert!(!err.is_stale_reference());
        assert!(matches!(BrowserError::from(err), BrowserError::ActionFailed(_)));
    }

    #[test]
    fn test_session_closed_maps() {
        let err: BrowserError = CdpError::SessionClosed.into();
        assert!(matches!(err, BrowserError::SessionClosed));
    }

    #[test]
    fn test_navigation_failure_maps() {
        let err: BrowserError = CdpError::NavigationFailed("net::ERR_NAME_NOT_RESOLVED".into()).into();
        match err {
            BrowserError::NavigationFailed(msg) => assert!(msg.contains("ERR_NAME_NOT_RESOLVED")),
            other => panic!("Expected NavigationFailed, got {:?}", other),
        }
    }
}
