//! In-memory diary portal for session and run loop tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use diary_config::DiaryConfig;
use diary_core::{Element, MonthDay, ScheduleEntry, ScheduleStore, UiDriver, UiError};
use diary_generator::{ContentGenerator, GeneratorSettings};
use diary_runloop::{DiarySession, Pacer, RetryPolicy};
use parking_lot::Mutex;

pub const LOGIN_URL: &str = "https://portal.test/login.do";
pub const MAIN_URL: &str = "https://portal.test/diaryMain.do";
pub const DETAIL_URL: &str = "https://portal.test/diaryDetail.do";
pub const PASSWORD: &str = "secret";

/// One saved diary entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Saved {
    pub start: String,
    pub end: String,
    pub crop: Option<String>,
    pub task: Option<String>,
    pub memo: String,
    pub lands: usize,
    pub varieties: usize,
    pub fields: HashMap<String, String>,
}

#[derive(Debug, Default)]
pub struct PageState {
    pub url: String,
    pub closed: bool,
    pub username: String,
    pub password: String,
    /// Whether the main page shows the "write diary" link.
    pub write_link: bool,

    pub start_date: String,
    pub end_date: String,
    pub crops: Vec<(String, String)>,
    pub crop: Option<String>,
    pub lands: Vec<bool>,
    pub varieties: Vec<bool>,
    pub tasks: Vec<(String, String)>,
    pub task: Option<String>,
    pub memo: String,
    pub fields: HashMap<String, String>,

    pub pending_dialogs: usize,
    pub accepted_dialogs: usize,
    pub saved: Vec<Saved>,

    /// Writes to these selectors are dropped this many times.
    pub ignored_writes: HashMap<String, usize>,
    /// Errors returned by the next lookups of a selector.
    pub failures: HashMap<String, VecDeque<UiError>>,
    /// Every selector looked up, in order.
    pub lookups: Vec<String>,
    pub navigations: Vec<String>,
}

/// Fake browser page implementing the diary portal's form.
pub struct FakePage {
    state: Mutex<PageState>,
}

impl FakePage {
    pub fn new() -> Arc<Self> {
        let state = PageState {
            url: "about:blank".to_string(),
            write_link: true,
            crops: vec![
                ("품목선택".to_string(), String::new()),
                ("벼".to_string(), "C01".to_string()),
                ("콩".to_string(), "C02".to_string()),
            ],
            lands: vec![false, false],
            varieties: vec![false],
            tasks: vec![
                ("작업단계 선택".to_string(), String::new()),
                ("파종작업".to_string(), "T02".to_string()),
                ("비료작업".to_string(), "T05".to_string()),
                ("수확작업".to_string(), "T08".to_string()),
                ("출하/판매작업".to_string(), "T09".to_string()),
            ],
            ..PageState::default()
        };
        Arc::new(Self {
            state: Mutex::new(state),
        })
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut PageState) -> R) -> R {
        f(&mut self.state.lock())
    }

    pub fn saved(&self) -> Vec<Saved> {
        self.state.lock().saved.clone()
    }

    /// Drop the next `times` writes to `selector`.
    pub fn ignore_writes(&self, selector: &str, times: usize) {
        self.state.lock().ignored_writes.insert(selector.to_string(), times);
    }

    /// Fail the next lookups of `selector` with `errors`, in order.
    pub fn fail(&self, selector: &str, errors: Vec<UiError>) {
        self.state
            .lock()
            .failures
            .insert(selector.to_string(), errors.into());
    }

    pub fn lookups_of(&self, selector: &str) -> usize {
        self.state.lock().lookups.iter().filter(|s| *s == selector).count()
    }
}

fn on_page(state: &PageState, url: &str) -> bool {
    state.url.starts_with(url)
}

fn element(selector: &str, index: usize, tag: &str, text: &str, value: Option<&str>, checked: bool) -> Element {
    Element {
        selector: selector.to_string(),
        index,
        tag: tag.to_string(),
        text: text.to_string(),
        value: value.map(str::to_string),
        checked,
    }
}

fn options(selector: &str, list: &[(String, String)]) -> Vec<Element> {
    list.iter()
        .enumerate()
        .map(|(i, (label, value))| element(selector, i, "option", label, Some(value.as_str()), false))
        .collect()
}

fn checked_option(selector: &str, list: &[(String, String)], chosen: &Option<String>) -> Vec<Element> {
    let found = chosen
        .as_ref()
        .and_then(|value| list.iter().position(|(_, v)| v == value))
        .unwrap_or(0);
    list.get(found)
        .map(|(label, value)| vec![element(selector, found, "option", label, Some(value.as_str()), true)])
        .unwrap_or_default()
}

fn boxes(selector: &str, list: &[bool], only_checked: bool) -> Vec<Element> {
    list.iter()
        .enumerate()
        .filter(|(_, checked)| !only_checked || **checked)
        .map(|(i, checked)| element(selector, i, "input", "", Some(format!("B{}", i).as_str()), *checked))
        .collect()
}

fn snapshot(state: &PageState, selector: &str) -> Vec<Element> {
    let login = on_page(state, LOGIN_URL);
    let main = on_page(state, MAIN_URL);
    let detail = on_page(state, DETAIL_URL);
    let one = |tag: &str, text: &str, value: Option<&str>| vec![element(selector, 0, tag, text, value, false)];

    match selector {
        "#memberId" if login => one("input", "", Some(state.username.as_str())),
        "#pwd" if login => one("input", "", Some(state.password.as_str())),
        "div.btnCon > button.login" if login => one("button", "로그인", None),

        "div.action_box > a[href*='goView'][href*='diaryMain']"
        | "a[href=\"javascript:goView('I', 'diaryMain')\"]"
        | "a[href*='goView'][href*='diaryMain']"
            if main && state.write_link =>
        {
            one("a", "영농일지 등록", None)
        }
        "a" if main && state.write_link => vec![
            element(selector, 0, "a", "홈", None, false),
            element(selector, 1, "a", "영농일지 등록", None, false),
        ],

        "#now_date_s" if detail => one("input", "", Some(state.start_date.as_str())),
        "#now_date_e" if detail => one("input", "", Some(state.end_date.as_str())),
        "#selectCrops" if detail => one("select", "", state.crop.as_deref().or(Some(""))),
        "#selectCrops option" if detail => options(selector, &state.crops),
        "#selectCrops option:checked" if detail => checked_option(selector, &state.crops, &state.crop),
        "#checkLand input[type='checkbox']" if detail => boxes(selector, &state.lands, false),
        "#checkLand input[type='checkbox']:checked" if detail => boxes(selector, &state.lands, true),
        "#checkScrop input[type='checkbox']" if detail => boxes(selector, &state.varieties, false),
        "#checkScrop input[type='checkbox']:checked" if detail => boxes(selector, &state.varieties, true),
        "#selectTask" if detail => one("select", "", state.task.as_deref().or(Some(""))),
        "#selectTask option" if detail => options(selector, &state.tasks),
        "#selectTask option:checked" if detail => checked_option(selector, &state.tasks, &state.task),
        "#memo" if detail => one("textarea", "", Some(state.memo.as_str())),
        "#upsert_diary" if detail => one("button", "저장", None),
        "#amount2" | "#amount3" | "#unit" | "#perPyeongAmount" | "#seedbedAmount" if detail => {
            one("input", "", Some(state.fields.get(selector).map(String::as_str).unwrap_or("")))
        }
        "#wfKor" | "#low_temp" | "#high_temp" | "#r12" | "#reh" if detail => {
            match state.fields.get(selector) {
                Some(value) => one("input", "", Some(value.as_str())),
                None => Vec::new(),
            }
        }
        _ => Vec::new(),
    }
}

impl PageState {
    fn take_failure(&mut self, selector: &str) -> Result<(), UiError> {
        self.lookups.push(selector.to_string());
        match self.failures.get_mut(selector).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn ensure_open(&self) -> Result<(), UiError> {
        if self.closed {
            Err(UiError::SessionClosed)
        } else {
            Ok(())
        }
    }

    fn write_ignored(&mut self, selector: &str) -> bool {
        match self.ignored_writes.get_mut(selector) {
            Some(left) if *left > 0 => {
                *left -= 1;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl UiDriver for FakePage {
    async fn navigate(&self, url: &str) -> Result<(), UiError> {
        let mut state = self.state.lock();
        state.ensure_open()?;
        state.take_failure(url)?;
        state.navigations.push(url.to_string());
        state.url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String, UiError> {
        let state = self.state.lock();
        state.ensure_open()?;
        Ok(state.url.clone())
    }

    async fn find_element(&self, selector: &str) -> Result<Element, UiError> {
        self.find_elements(selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| UiError::ElementNotFound(selector.to_string()))
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<Element>, UiError> {
        let mut state = self.state.lock();
        state.ensure_open()?;
        state.take_failure(selector)?;
        Ok(snapshot(&state, selector))
    }

    async fn get_value(&self, element: &Element) -> Result<String, UiError> {
        let state = self.state.lock();
        state.ensure_open()?;
        snapshot(&state, &element.selector)
            .into_iter()
            .nth(element.index)
            .map(|e| e.value.unwrap_or(e.text))
            .ok_or_else(|| UiError::StaleElement(element.selector.clone()))
    }

    async fn set_value(&self, element: &Element, text: &str) -> Result<(), UiError> {
        let mut state = self.state.lock();
        state.ensure_open()?;
        if state.write_ignored(&element.selector) {
            return Ok(());
        }
        match element.selector.as_str() {
            "#memberId" => state.username = text.to_string(),
            "#pwd" => state.password = text.to_string(),
            "#now_date_s" => state.start_date = text.to_string(),
            "#now_date_e" => state.end_date = text.to_string(),
            "#selectCrops" => state.crop = Some(text.to_string()),
            "#selectTask" => state.task = Some(text.to_string()),
            "#memo" => state.memo = text.to_string(),
            other => {
                state.fields.insert(other.to_string(), text.to_string());
            }
        }
        Ok(())
    }

    async fn click(&self, element: &Element) -> Result<(), UiError> {
        let mut state = self.state.lock();
        state.ensure_open()?;
        let index = element.index;
        match element.selector.as_str() {
            "div.btnCon > button.login" => {
                if state.password == PASSWORD {
                    state.url = MAIN_URL.to_string();
                }
            }
            "div.action_box > a[href*='goView'][href*='diaryMain']"
            | "a[href=\"javascript:goView('I', 'diaryMain')\"]"
            | "a[href*='goView'][href*='diaryMain']" => state.url = DETAIL_URL.to_string(),
            "a" if element.text.contains("영농일지 등록") => state.url = DETAIL_URL.to_string(),
            "#checkLand input[type='checkbox']" => {
                if let Some(checked) = state.lands.get_mut(index) {
                    *checked = !*checked;
                }
            }
            "#checkScrop input[type='checkbox']" => {
                if let Some(checked) = state.varieties.get_mut(index) {
                    *checked = !*checked;
                }
            }
            "#upsert_diary" => {
                let saved = Saved {
                    start: state.start_date.clone(),
                    end: state.end_date.clone(),
                    crop: state.crop.clone(),
                    task: state.task.clone(),
                    memo: state.memo.clone(),
                    lands: state.lands.iter().filter(|c| **c).count(),
                    varieties: state.varieties.iter().filter(|c| **c).count(),
                    fields: state.fields.clone(),
                };
                state.saved.push(saved);
                state.pending_dialogs = 2;
            }
            _ => {}
        }
        Ok(())
    }

    async fn wait_for(&self, selector: &str, _timeout: Duration) -> Result<Element, UiError> {
        self.find_elements(selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| UiError::Timeout(selector.to_string()))
    }

    async fn accept_pending_dialog(&self) -> Result<bool, UiError> {
        let mut state = self.state.lock();
        state.ensure_open()?;
        if state.pending_dialogs > 0 {
            state.pending_dialogs -= 1;
            state.accepted_dialogs += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn close(&self) -> Result<(), UiError> {
        self.state.lock().closed = true;
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Config pointing at the fake portal and logging into `log_dir`.
pub fn config(log_dir: &Path) -> DiaryConfig {
    let mut config = DiaryConfig::default();
    config.account.username = "farmer".to_string();
    config.account.password = PASSWORD.to_string();
    config.site.login_url = LOGIN_URL.to_string();
    config.site.main_url = MAIN_URL.to_string();
    config.site.detail_url = DETAIL_URL.to_string();
    config.generator.enabled = false;
    config.diary.start_date = date(2021, 2, 1);
    config.diary.end_date = date(2021, 2, 28);
    config.logging.dir = log_dir.to_path_buf();
    config
}

/// Seeding scheduled through March, nothing else.
pub fn schedule() -> ScheduleStore {
    ScheduleStore::from_entries(vec![ScheduleEntry {
        task_name: "파종작업".to_string(),
        start: MonthDay::new(3, 1).unwrap(),
        end: MonthDay::new(3, 31).unwrap(),
        description: "볍씨 파종".to_string(),
        stage: "육묘".to_string(),
    }])
}

pub fn session(page: &Arc<FakePage>, config: DiaryConfig, schedule: ScheduleStore) -> DiarySession {
    let driver: Arc<dyn UiDriver> = page.clone();
    DiarySession::new(
        driver,
        Arc::new(config),
        Arc::new(ContentGenerator::new(GeneratorSettings::default())),
        Arc::new(schedule),
    )
    .with_pacer(Pacer::instant())
    .with_retry(RetryPolicy::immediate())
}
