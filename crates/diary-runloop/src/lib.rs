//! # Diary RunLoop
//!
//! Drives the diary portal one week at a time.
//!
//! ```text
//! DiaryRunner::run
//!   ├── resume cursor (diary log)      diary_core::progress
//!   ├── login + open the diary page
//!   └── for each WeekWindow
//!         DiarySession::write_window
//!           Navigating → RangeSet → CropSelected → LandSelected
//!           → VarietySelected → TaskSelected → ContentEntered
//!           → Validating → Submitted
//!         on failure: one recovery, one retry of the same window
//! ```
//!
//! ## Key Components
//!
//! - [`DiaryRunner`]: the week loop with progress reporting
//! - [`DiarySession`]: fills and submits one diary form
//! - [`StateTracker`]: guards the session state transitions
//! - [`RetryPolicy`]: the single backoff policy for transient UI errors
//! - [`Pacer`]: human-like random pauses between actions

mod pacing;
mod retry;
mod run_loop;
mod session;

pub use pacing::{DelayKind, Pacer};
pub use retry::RetryPolicy;
pub use run_loop::{DiaryRunner, RunSummary};
pub use session::{
    extra_fields, DiaryDraft, DiarySession, FormField, InvalidTransition, SessionState,
    StateTracker, WindowOutcome,
};
