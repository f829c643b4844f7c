//! # Diary Core
//!
//! Shared building blocks for the farm diary writer:
//!
//! - [`UiDriver`]: the browser capability the session drives
//! - [`ScheduleStore`]: recurring farming tasks loaded from JSON
//! - [`match_task`]: maps a scheduled task name onto a live dropdown option
//! - [`WeekWindows`]: the sequence of diary windows between two dates
//! - [`progress`]: the completion marker written to the diary log and read
//!   back on resume

mod driver;
mod error;
mod matcher;
pub mod progress;
mod schedule;
mod window;

pub use driver::{AvailableOption, Element, UiDriver};
pub use error::{DiaryError, DiaryResult, UiError};
pub use matcher::{match_task, MatchRule, TaskMatch};
pub use schedule::{MonthDay, ScheduleEntry, ScheduleStore};
pub use window::{WeekWindow, WeekWindows};
