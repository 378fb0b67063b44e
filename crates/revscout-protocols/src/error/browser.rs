//! Browser capability errors.

use thiserror::Error;

/// Errors raised by a browser backend.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Chrome not found. Please install Google Chrome or Chromium.")]
    ChromeNotFound,

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Element is detached or stale: {0}")]
    StaleElement(String),

    #[error("Invalid locator '{locator}': {message}")]
    InvalidLocator { locator: String, message: String },

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("Browser session closed")]
    SessionClosed,
}

impl BrowserError {
    /// Whether this error represents an exceeded wait.
    pub fn is_timeout(&self) -> bool {
        matches!(self, BrowserError::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_classification() {
        assert!(BrowserError::Timeout("load".to_string()).is_timeout());
        assert!(!BrowserError::SessionClosed.is_timeout());
        assert!(!BrowserError::NavigationFailed("dns".to_string()).is_timeout());
    }

    #[test]
    fn test_invalid_locator_display() {
        let err = BrowserError::InvalidLocator {
            locator: "div[".to_string(),
            message: "SyntaxError".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("div["));
        assert!(display.contains("SyntaxError"));
    }
}
