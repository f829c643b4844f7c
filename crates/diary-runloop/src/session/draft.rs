//! In-progress form contents for one window.

use diary_core::{TaskMatch, WeekWindow};

/// What the session has put on the form so far.
///
/// Built up step by step; validation re-fills missing fields from it.
#[derive(Debug, Clone, PartialEq)]
pub struct DiaryDraft {
    pub window: WeekWindow,
    pub crop: String,
    /// Values of the checked land parcel boxes.
    pub lands: Vec<String>,
    /// Values of the checked variety boxes.
    pub varieties: Vec<String>,
    /// Schedule task the entry was written for, if any.
    pub scheduled_task: Option<String>,
    pub matched_task: Option<TaskMatch>,
    pub content: Option<String>,
}

impl DiaryDraft {
    pub fn new(window: WeekWindow, crop: impl Into<String>) -> Self {
        Self {
            window,
            crop: crop.into(),
            lands: Vec::new(),
            varieties: Vec::new(),
            scheduled_task: None,
            matched_task: None,
            content: None,
        }
    }

    /// Label of the chosen task step.
    pub fn task_label(&self) -> Option<&str> {
        self.matched_task.as_ref().map(|m| m.label.as_str())
    }

    /// Whether this is a basic-management entry with no scheduled task.
    pub fn is_basic(&self) -> bool {
        self.scheduled_task.is_none()
    }
}
