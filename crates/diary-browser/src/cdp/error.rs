//! CDP error types.

use diary_core::UiError;
use thiserror::Error;

/// CDP client errors.
#[derive(Debug, Error)]
pub enum CdpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Chrome not running with remote debugging.
    #[error("Chrome not available at {0}. Start Chrome with: chrome --remote-debugging-port=9222")]
    ChromeNotAvailable(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error (for endpoint discovery).
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// The element was found earlier but is gone now.
    #[error("Element detached: {0}")]
    Detached(String),

    #[error("JavaScript error: {0}")]
    JavaScript(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    /// A JavaScript dialog is still open and swallows input.
    #[error("Dialog open: {0}")]
    DialogOpen(String),

    #[error("Session closed")]
    SessionClosed,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
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

impl From<CdpError> for UiError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::ElementNotFound(s) => UiError::ElementNotFound(s),
            CdpError::Detached(s) => UiError::StaleElement(s),
            CdpError::Timeout(s) => UiError::Timeout(s),
            CdpError::NavigationFailed(s) => UiError::Navigation(s),
            CdpError::JavaScript(s) => UiError::Script(s),
            CdpError::DialogOpen(s) => UiError::ClickIntercepted(s),
            CdpError::ConnectionFailed(s) | CdpError::ChromeNotAvailable(s) => UiError::Unavailable(s),
            CdpError::WebSocket(_) | CdpError::SessionClosed => UiError::SessionClosed,
            other => UiError::Driver(other.to_string()),
        }
    }
}
