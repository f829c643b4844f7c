//! Configuration schema definitions.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiaryConfig {
    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub diary: DiarySettings,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub pacing: PacingConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DiaryConfig {
    /// Snapshot with a different start date.
    pub fn with_start_date(&self, start_date: NaiveDate) -> Self {
        let mut next = self.clone();
        next.diary.start_date = start_date;
        next
    }

    /// Snapshot with a different end date.
    pub fn with_end_date(&self, end_date: NaiveDate) -> Self {
        let mut next = self.clone();
        next.diary.end_date = end_date;
        next
    }
}

/// Portal credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Which weeks to write and what to write them for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiarySettings {
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,

    #[serde(default = "default_end_date")]
    pub end_date: NaiveDate,

    #[serde(default = "default_interval_days")]
    pub interval_days: u32,

    #[serde(default = "default_crop")]
    pub crop: String,

    /// Keep crop, land and variety from the previous window instead of
    /// selecting them again.
    #[serde(default)]
    pub reuse_selection: bool,

    #[serde(default = "default_excluded_tasks")]
    pub excluded_tasks: Vec<String>,

    #[serde(default = "default_validation_attempts")]
    pub validation_attempts: u32,
}

impl Default for DiarySettings {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            end_date: default_end_date(),
            interval_days: default_interval_days(),
            crop: default_crop(),
            reuse_selection: false,
            excluded_tasks: default_excluded_tasks(),
            validation_attempts: default_validation_attempts(),
        }
    }
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 2, 1).unwrap_or(NaiveDate::MIN)
}

fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or(NaiveDate::MIN)
}

fn default_interval_days() -> u32 {
    7
}

fn default_crop() -> String {
    "벼".to_string()
}

fn default_excluded_tasks() -> Vec<String> {
    vec!["출하/판매작업".to_string(), "병해충 피해".to_string()]
}

fn default_validation_attempts() -> u32 {
    3
}

/// Portal URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_login_url")]
    pub login_url: String,

    #[serde(default = "default_main_url")]
    pub main_url: String,

    #[serde(default = "default_detail_url")]
    pub detail_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            login_url: default_login_url(),
            main_url: default_main_url(),
            detail_url: default_detail_url(),
        }
    }
}

fn default_login_url() -> String {
    "https://www.agrion.kr/portal/gc/ml/mberLoginForm.do".to_string()
}

fn default_main_url() -> String {
    "https://www.agrion.kr/portal/farm/diaryMain.do".to_string()
}

fn default_detail_url() -> String {
    "https://www.agrion.kr/portal/farm/diaryDetail.do".to_string()
}

/// Chrome DevTools connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Element wait used for ordinary page elements.
    #[serde(default = "default_wait_secs")]
    pub wait_secs: u64,

    /// Element wait used after login and page transitions.
    #[serde(default = "default_long_wait_secs")]
    pub long_wait_secs: u64,
}

impl BrowserConfig {
    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_secs)
    }

    pub fn long_wait(&self) -> Duration {
        Duration::from_secs(self.long_wait_secs)
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            wait_secs: default_wait_secs(),
            long_wait_secs: default_long_wait_secs(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:9222".to_string()
}

fn default_wait_secs() -> u64 {
    8
}

fn default_long_wait_secs() -> u64 {
    12
}

/// External text generation.
#[derive(Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl GeneratorConfig {
    /// A blank key counts as no key.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("enabled", &self.enabled)
            .field("api_key", &self.credential().map(|_| "***"))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("max_chars", &self.max_chars)
            .finish()
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            max_chars: default_max_chars(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    50
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_chars() -> usize {
    200
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Inclusive millisecond range a random pause is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub fn is_ordered(&self) -> bool {
        self.min_ms <= self.max_ms
    }
}

/// Human-like pause ranges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    #[serde(default = "default_input_delay")]
    pub input: DelayRange,

    #[serde(default = "default_select_delay")]
    pub select: DelayRange,

    #[serde(default = "default_server_load_delay")]
    pub server_load: DelayRange,

    #[serde(default = "default_fast_wait")]
    pub fast_wait: DelayRange,

    #[serde(default = "default_long_wait")]
    pub long_wait: DelayRange,

    /// Pause between two diary windows.
    #[serde(default = "default_between_windows")]
    pub between_windows: DelayRange,
}

impl PacingConfig {
    /// Every range by its config path.
    pub fn ranges(&self) -> [(&'static str, DelayRange); 6] {
        [
            ("pacing.input", self.input),
            ("pacing.select", self.select),
            ("pacing.server_load", self.server_load),
            ("pacing.fast_wait", self.fast_wait),
            ("pacing.long_wait", self.long_wait),
            ("pacing.between_windows", self.between_windows),
        ]
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            input: default_input_delay(),
            select: default_select_delay(),
            server_load: default_server_load_delay(),
            fast_wait: default_fast_wait(),
            long_wait: default_long_wait(),
            between_windows: default_between_windows(),
        }
    }
}

fn default_input_delay() -> DelayRange {
    DelayRange::new(300, 800)
}

fn default_select_delay() -> DelayRange {
    DelayRange::new(500, 1200)
}

fn default_server_load_delay() -> DelayRange {
    DelayRange::new(800, 1500)
}

fn default_fast_wait() -> DelayRange {
    DelayRange::new(3500, 4500)
}

fn default_long_wait() -> DelayRange {
    DelayRange::new(5500, 6500)
}

fn default_between_windows() -> DelayRange {
    DelayRange::new(3000, 8000)
}

/// Farming schedule source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_schedule_path")]
    pub path: PathBuf,

    /// Days a scheduled period is widened by on each side.
    #[serde(default = "default_tolerance_days")]
    pub tolerance_days: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            path: default_schedule_path(),
            tolerance_days: default_tolerance_days(),
        }
    }
}

fn default_schedule_path() -> PathBuf {
    PathBuf::from("data/rice_schedule.json")
}

fn default_tolerance_days() -> u32 {
    15
}

/// Diary log output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    #[serde(default = "default_max_file_mb")]
    pub max_file_mb: u64,

    #[serde(default = "default_level")]
    pub level: String,
}

impl LoggingConfig {
    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            file_prefix: default_file_prefix(),
            max_file_mb: default_max_file_mb(),
            level: default_level(),
        }
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("log")
}

fn default_file_prefix() -> String {
    "diary_log".to_string()
}

fn default_max_file_mb() -> u64 {
    100
}

fn default_level() -> String {
    "info".to_string()
}
