//! Text generation errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for GeneratorError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GeneratorError::Timeout
        } else if e.is_decode() {
            GeneratorError::MalformedResponse(e.to_string())
        } else {
            GeneratorError::Network(e.to_string())
        }
    }
}
