//! Session state machine.

use std::fmt;

use diary_core::DiaryError;
use thiserror::Error;

/// Where a diary session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Navigating,
    RangeSet,
    CropSelected,
    LandSelected,
    VarietySelected,
    TaskSelected,
    ContentEntered,
    Validating,
    Submitted,
    Failed,
}

impl SessionState {
    /// The state that normally follows this one.
    pub fn next(&self) -> Option<SessionState> {
        match self {
            SessionState::Navigating => Some(SessionState::RangeSet),
            SessionState::RangeSet => Some(SessionState::CropSelected),
            SessionState::CropSelected => Some(SessionState::LandSelected),
            SessionState::LandSelected => Some(SessionState::VarietySelected),
            SessionState::VarietySelected => Some(SessionState::TaskSelected),
            SessionState::TaskSelected => Some(SessionState::ContentEntered),
            SessionState::ContentEntered => Some(SessionState::Validating),
            SessionState::Validating => Some(SessionState::Submitted),
            SessionState::Submitted | SessionState::Failed => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Submitted | SessionState::Failed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Navigating => write!(f, "navigating"),
            SessionState::RangeSet => write!(f, "range_set"),
            SessionState::CropSelected => write!(f, "crop_selected"),
            SessionState::LandSelected => write!(f, "land_selected"),
            SessionState::VarietySelected => write!(f, "variety_selected"),
            SessionState::TaskSelected => write!(f, "task_selected"),
            SessionState::ContentEntered => write!(f, "content_entered"),
            SessionState::Validating => write!(f, "validating"),
            SessionState::Submitted => write!(f, "submitted"),
            SessionState::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid session transition from {from} to {to}")]
pub struct InvalidTransition {
    pub from: SessionState,
    pub to: SessionState,
}

impl From<InvalidTransition> for DiaryError {
    fn from(e: InvalidTransition) -> Self {
        DiaryError::session(e.from, e)
    }
}

/// Enforces the state order for one session.
///
/// Steps may not be skipped, with one exception: when the previous window
/// was submitted and selection reuse is on, `RangeSet → VarietySelected`
/// keeps the crop, land and variety already on the form.
#[derive(Debug, Clone)]
pub struct StateTracker {
    state: SessionState,
    allow_reuse: bool,
    history: Vec<SessionState>,
}

impl StateTracker {
    pub fn new(allow_reuse: bool) -> Self {
        Self {
            state: SessionState::Navigating,
            allow_reuse,
            history: vec![SessionState::Navigating],
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Every state visited so far, in order.
    pub fn history(&self) -> &[SessionState] {
        &self.history
    }

    pub fn can_reuse(&self) -> bool {
        self.allow_reuse
    }

    pub fn advance(&mut self, to: SessionState) -> Result<(), InvalidTransition> {
        let from = self.state;
        let allowed = match (from, to) {
            (f, SessionState::Failed) => !f.is_terminal(),
            (SessionState::RangeSet, SessionState::VarietySelected) => self.allow_reuse,
            (f, t) => f.next() == Some(t),
        };
        if !allowed {
            return Err(InvalidTransition { from, to });
        }
        self.state = to;
        self.history.push(to);
        Ok(())
    }

    /// Mark the session failed. A terminal session stays as it is.
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.state = SessionState::Failed;
            self.history.push(SessionState::Failed);
        }
    }
}
