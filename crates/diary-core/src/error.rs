//! Error taxonomy shared by the driver, the session and the run loop.

use thiserror::Error;

/// Errors raised by a [`UiDriver`](crate::UiDriver).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UiError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Click intercepted: {0}")]
    ClickIntercepted(String),

    #[error("Stale element: {0}")]
    StaleElement(String),

    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Dialog handling failed: {0}")]
    Dialog(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Browser unavailable: {0}")]
    Unavailable(String),

    #[error("UI session closed")]
    SessionClosed,

    #[error("Driver error: {0}")]
    Driver(String),
}

impl UiError {
    /// Errors that usually clear up after a short wait or a second attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            UiError::ElementNotFound(_)
                | UiError::ClickIntercepted(_)
                | UiError::StaleElement(_)
                | UiError::Timeout(_)
        )
    }
}

/// Errors surfaced by the diary session and the run loop.
#[derive(Debug, Error)]
pub enum DiaryError {
    /// A UI step failed. Transient variants are retried at the session boundary.
    #[error(transparent)]
    Ui(#[from] UiError),

    /// Required fields were still empty after the re-fill attempts.
    #[error("Required fields still missing: {}", .missing.join(", "))]
    ValidationGap { missing: Vec<String> },

    /// The session for one window had to be abandoned.
    #[error("Session failed at {state}: {message}")]
    Session { state: String, message: String },

    /// Nothing sensible can continue (no browser, login rejected).
    #[error("Fatal: {0}")]
    Fatal(String),
}

impl DiaryError {
    pub fn session(state: impl ToString, message: impl ToString) -> Self {
        DiaryError::Session {
            state: state.to_string(),
            message: message.to_string(),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, DiaryError::Ui(e) if e.is_transient())
    }

    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DiaryError::Fatal(_) | DiaryError::Ui(UiError::Unavailable(_) | UiError::SessionClosed)
        )
    }
}

pub type DiaryResult<T> = Result<T, DiaryError>;
