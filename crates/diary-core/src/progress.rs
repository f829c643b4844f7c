//! Completion markers in the diary log.
//!
//! Every submitted window leaves a line like
//! `✅ 2021-02-08 ~ 2021-02-14 영농일지 등록 완료` in the log. On the next run
//! the newest marker tells where to pick up.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use regex::Regex;
use tracing::{debug, warn};

use crate::window::WeekWindow;

const MARKER_PATTERN: &str = r"✅ (\d{4}-\d{2}-\d{2}) .* 영농일지 등록 완료";

/// Line written after a window was saved.
pub fn completion_line(window: &WeekWindow) -> String {
    format!("✅ {} 영농일지 등록 완료", window)
}

/// Date of the last completion marker in `text`, if any.
///
/// The captured date is the first date on the line, i.e. the window start.
pub fn last_completed_in(text: &str) -> Option<NaiveDate> {
    let re = Regex::new(MARKER_PATTERN).ok()?;
    text.lines()
        .filter_map(|line| re.captures(line))
        .filter_map(|cap| NaiveDate::parse_from_str(&cap[1], "%Y-%m-%d").ok())
        .last()
}

/// Diary log files in `dir` named `<prefix>_*.txt`, newest first.
///
/// Names embed a `YYYYMMDD_HHMMSS` stamp followed by an optional rotation
/// part (`_1`, `_2`, ...), compared numerically.
pub fn log_files(dir: &Path, prefix: &str) -> io::Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let name_prefix = format!("{}_", prefix);
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&name_prefix) && name.ends_with(".txt"))
        })
        .collect();

    files.sort_by_cached_key(|path| {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let (stamp, part) = rotation_order(&name[name_prefix.len().min(name.len())..]);
        (stamp.to_string(), part)
    });
    files.reverse();
    Ok(files)
}

/// Split `<stamp>[_<part>].txt` into the stamp and the part number.
fn rotation_order(rest: &str) -> (&str, u32) {
    let base = rest.trim_end_matches(".txt");
    match base.rsplit_once('_') {
        Some((stamp, part)) if stamp.contains('_') => match part.parse() {
            Ok(part) => (stamp, part),
            Err(_) => (base, 0),
        },
        _ => (base, 0),
    }
}

/// Start date of the newest completed window across the log files.
///
/// Files are read newest first; the first one holding any marker decides.
/// Empty or marker-free files (such as the one just opened for this run) are
/// passed over.
pub fn find_last_completed(dir: &Path, prefix: &str) -> io::Result<Option<NaiveDate>> {
    for path in log_files(dir, prefix)? {
        let text = match fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!("Cannot read log file {}: {}", path.display(), e);
                continue;
            }
        };

        if let Some(date) = last_completed_in(&text) {
            debug!("Last completed window {} found in {}", date, path.display());
            return Ok(Some(date));
        }
    }
    Ok(None)
}

/// Start of the window after one that began on `last_completed`.
pub fn next_start(last_completed: NaiveDate, interval_days: u32) -> NaiveDate {
    last_completed
        .checked_add_days(Days::new(u64::from(interval_days.max(1))))
        .unwrap_or(NaiveDate::MAX)
}

/// Where a run should begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumePoint {
    /// No usable marker; use the configured start.
    Configured(NaiveDate),
    /// Continue after the last completed window.
    Resumed {
        last_completed: NaiveDate,
        start: NaiveDate,
    },
}

impl ResumePoint {
    pub fn start(&self) -> NaiveDate {
        match self {
            ResumePoint::Configured(start) => *start,
            ResumePoint::Resumed { start, .. } => *start,
        }
    }
}

/// Resolve the start date from the logs. A marker only moves the start
/// forward; a configured start past the marker wins.
pub fn resume_point(
    configured: NaiveDate,
    log_dir: &Path,
    prefix: &str,
    interval_days: u32,
) -> ResumePoint {
    let last = match find_last_completed(log_dir, prefix) {
        Ok(last) => last,
        Err(e) => {
            warn!("Log scan failed ({}), using configured start date", e);
            None
        }
    };

    match last {
        Some(last_completed) => {
            let start = next_start(last_completed, interval_days);
            if start > configured {
                ResumePoint::Resumed { last_completed, start }
            } else {
                ResumePoint::Configured(configured)
            }
        }
        None => ResumePoint::Configured(configured),
    }
}
