//! Recurring farming schedule.
//!
//! Source layout is `{ month: { stage: [ { "작업명", "기간", "설명" } ] } }`
//! where `기간` reads `"MM-DD ~ MM-DD"`. Periods ignore the year and repeat
//! every season.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Deserialize;
use tracing::{debug, warn};

/// A calendar day without a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// `None` for days that never exist (Feb 30, Apr 31, ...).
    pub fn new(month: u32, day: u32) -> Option<Self> {
        // 2000 is a leap year so Feb 29 is accepted.
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| Self { month, day })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// This day in `year`; Feb 29 becomes Feb 28 outside leap years.
    pub fn in_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
            .or_else(|| NaiveDate::from_ymd_opt(year, self.month, self.day.saturating_sub(1)))
    }
}

impl FromStr for MonthDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (month, day) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("expected MM-DD, got '{}'", s))?;
        let month: u32 = month.parse().map_err(|_| format!("bad month in '{}'", s))?;
        let day: u32 = day.parse().map_err(|_| format!("bad day in '{}'", s))?;
        MonthDay::new(month, day).ok_or_else(|| format!("no such day '{}'", s))
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// One scheduled task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub task_name: String,
    pub start: MonthDay,
    pub end: MonthDay,
    pub description: String,
    pub stage: String,
}

impl ScheduleEntry {
    /// Whether `date` falls inside the period widened by `tolerance_days`
    /// on both sides. Periods whose end precedes their start wrap the year.
    pub fn covers(&self, date: NaiveDate, tolerance_days: u32) -> bool {
        let tolerance = Duration::days(i64::from(tolerance_days));
        let wraps = self.end < self.start;

        (date.year() - 1..=date.year() + 1).any(|year| {
            let end_year = if wraps { year + 1 } else { year };
            match (self.start.in_year(year), self.end.in_year(end_year)) {
                (Some(start), Some(end)) => start - tolerance <= date && date <= end + tolerance,
                _ => false,
            }
        })
    }

    pub fn period(&self) -> String {
        format!("{} ~ {}", self.start, self.end)
    }
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(rename = "작업명")]
    task_name: String,
    #[serde(rename = "기간")]
    period: String,
    #[serde(rename = "설명", default)]
    description: String,
}

type RawSchedule = BTreeMap<String, BTreeMap<String, Vec<RawEntry>>>;

/// Read-only schedule, flattened from the nested source.
#[derive(Debug, Clone, Default)]
pub struct ScheduleStore {
    entries: Vec<ScheduleEntry>,
}

impl ScheduleStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }

    /// Load from a JSON file. A missing or malformed file yields an empty
    /// store so the run falls back to basic diary entries.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Schedule file {} unavailable ({}), no scheduled tasks", path.display(), e);
                return Self::empty();
            }
        };

        match Self::from_json_str(&content) {
            Ok(store) => {
                debug!("Loaded {} scheduled tasks from {}", store.len(), path.display());
                store
            }
            Err(e) => {
                warn!("Schedule file {} is malformed ({}), no scheduled tasks", path.display(), e);
                Self::empty()
            }
        }
    }

    /// Parse the nested JSON layout. Entries with an unreadable period are
    /// skipped individually.
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        let raw: RawSchedule = serde_json::from_str(content)?;
        let mut entries = Vec::new();

        for (month, stages) in raw {
            for (stage, tasks) in stages {
                for task in tasks {
                    match parse_period(&task.period) {
                        Ok((start, end)) => entries.push(ScheduleEntry {
                            task_name: task.task_name.trim().to_string(),
                            start,
                            end,
                            description: task.description,
                            stage: stage.clone(),
                        }),
                        Err(e) => warn!(
                            "Skipping '{}' in {}/{}: {}",
                            task.task_name, month, stage, e
                        ),
                    }
                }
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose period, widened by the tolerance, covers `date`.
    pub fn tasks_for(&self, date: NaiveDate, tolerance_days: u32) -> Vec<&ScheduleEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.covers(date, tolerance_days))
            .collect()
    }
}

fn parse_period(period: &str) -> Result<(MonthDay, MonthDay), String> {
    let (start, end) = period
        .split_once('~')
        .ok_or_else(|| format!("expected 'MM-DD ~ MM-DD', got '{}'", period))?;
    Ok((start.parse()?, end.parse()?))
}
