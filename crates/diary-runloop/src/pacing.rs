//! Human-like pauses between UI actions.

use std::fmt;
use std::time::Duration;

use diary_config::{DelayRange, PacingConfig};
use rand::Rng;

/// Category of pause, each with its own configured range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelayKind {
    /// Between keystrokes and checkbox clicks.
    Input,
    /// After opening a dropdown or datepicker.
    Select,
    /// After a change that reloads part of the form.
    ServerLoad,
    /// After a page navigation.
    FastWait,
    /// After login and recovery navigation.
    LongWait,
    /// Between two diary windows.
    BetweenWindows,
}

impl fmt::Display for DelayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelayKind::Input => write!(f, "input"),
            DelayKind::Select => write!(f, "select"),
            DelayKind::ServerLoad => write!(f, "server_load"),
            DelayKind::FastWait => write!(f, "fast_wait"),
            DelayKind::LongWait => write!(f, "long_wait"),
            DelayKind::BetweenWindows => write!(f, "between_windows"),
        }
    }
}

/// Draws pause lengths uniformly from the configured ranges.
#[derive(Debug, Clone)]
pub struct Pacer {
    /// `None` disables every pause.
    ranges: Option<PacingConfig>,
}

impl Pacer {
    pub fn from_config(config: &PacingConfig) -> Self {
        Self {
            ranges: Some(config.clone()),
        }
    }

    /// A pacer that never sleeps.
    pub fn instant() -> Self {
        Self { ranges: None }
    }

    pub fn is_instant(&self) -> bool {
        self.ranges.is_none()
    }

    fn range(&self, kind: DelayKind) -> Option<DelayRange> {
        let ranges = self.ranges.as_ref()?;
        Some(match kind {
            DelayKind::Input => ranges.input,
            DelayKind::Select => ranges.select,
            DelayKind::ServerLoad => ranges.server_load,
            DelayKind::FastWait => ranges.fast_wait,
            DelayKind::LongWait => ranges.long_wait,
            DelayKind::BetweenWindows => ranges.between_windows,
        })
    }

    /// Length of the next pause of `kind`.
    pub fn duration(&self, kind: DelayKind) -> Duration {
        let Some(range) = self.range(kind) else {
            return Duration::ZERO;
        };
        let ms = if range.min_ms >= range.max_ms {
            range.min_ms
        } else {
            rand::rng().random_range(range.min_ms..=range.max_ms)
        };
        Duration::from_millis(ms)
    }

    pub async fn pause(&self, kind: DelayKind) {
        let delay = self.duration(kind);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
