//! Diary windows between two dates.

use std::fmt;

use chrono::{Days, NaiveDate};

/// One diary submission unit: `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A single-day window.
    pub fn day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for WeekWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ {}", self.start, self.end)
    }
}

/// Contiguous, non-overlapping windows of `interval_days` from `start`,
/// the last one clipped to `end`.
#[derive(Debug, Clone)]
pub struct WeekWindows {
    next: Option<NaiveDate>,
    end: NaiveDate,
    interval_days: u32,
}

impl WeekWindows {
    /// An interval of zero is treated as one day.
    pub fn new(start: NaiveDate, end: NaiveDate, interval_days: u32) -> Self {
        Self {
            next: Some(start),
            end,
            interval_days: interval_days.max(1),
        }
    }

    /// Number of windows the full sequence yields.
    pub fn total(start: NaiveDate, end: NaiveDate, interval_days: u32) -> usize {
        if start > end {
            return 0;
        }
        let span = (end - start).num_days() as u64;
        (span / u64::from(interval_days.max(1))) as usize + 1
    }
}

impl Iterator for WeekWindows {
    type Item = WeekWindow;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next.filter(|start| *start <= self.end)?;
        let last_day = start
            .checked_add_days(Days::new(u64::from(self.interval_days - 1)))
            .unwrap_or(self.end);

        self.next = start.checked_add_days(Days::new(u64::from(self.interval_days)));
        Some(WeekWindow::new(start, last_day.min(self.end)))
    }
}
