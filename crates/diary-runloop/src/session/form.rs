//! Form steps: dates, crop, land, variety, task step, content and save.

use chrono::{Datelike, NaiveDate};
use diary_core::{DiaryResult, Element, MatchRule, TaskMatch, UiError, WeekWindow};
use diary_generator::Weather;
use rand::Rng;
use tracing::{debug, info, warn};

use super::selectors::*;
use super::DiarySession;
use crate::pacing::DelayKind;

/// Task steps preferred for a week without a scheduled task.
const BASIC_TASKS: [&str; 3] = ["기타작업", "비료작업", "관찰"];

/// Save confirmation plus the result notice.
const MAX_DIALOGS: usize = 2;

/// Task options worth choosing from: no placeholder, no empty values, none
/// of the excluded tasks.
pub(crate) fn filter_task_options(options: Vec<Element>, excluded: &[String]) -> Vec<Element> {
    options
        .into_iter()
        .filter(|option| {
            let label = option.label();
            let has_value = option.value.as_deref().is_some_and(|v| !v.trim().is_empty());
            !label.is_empty()
                && label != TASK_PLACEHOLDER
                && has_value
                && !excluded.iter().any(|task| label.contains(task.as_str()))
        })
        .collect()
}

/// Task step for a basic-management entry.
pub(crate) fn basic_task(labels: &[&str]) -> Option<TaskMatch> {
    let found = labels
        .iter()
        .position(|label| BASIC_TASKS.iter().any(|task| label.contains(task)));
    match found {
        Some(index) => Some(TaskMatch {
            label: labels[index].to_string(),
            index,
            rule: MatchRule::Keyword { category: "other" },
        }),
        None => labels.first().map(|label| TaskMatch {
            label: label.to_string(),
            index: 0,
            rule: MatchRule::Fallback,
        }),
    }
}

/// Quantity fields some task steps require, with plausible random values.
pub fn extra_fields(task: &str) -> Vec<(&'static str, String)> {
    let mut rng = rand::rng();
    if task.contains("수확작업") {
        vec![
            (HARVEST_AMOUNT, rng.random_range(150..=240).to_string()),
            (AMOUNT_UNIT, "kg".to_string()),
        ]
    } else if task.contains("파종작업") {
        vec![
            (SEEDING_AMOUNT, rng.random_range(60..=90).to_string()),
            (AMOUNT_UNIT, "kg".to_string()),
        ]
    } else if task.contains("이앙작업") {
        vec![
            (PER_PYEONG_AMOUNT, rng.random_range(15..=20).to_string()),
            (SEEDBED_AMOUNT, rng.random_range(15..=20).to_string()),
        ]
    } else {
        Vec::new()
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl DiarySession {
    pub(super) async fn value_of(&self, selector: &str) -> DiaryResult<String> {
        let element = self.driver.find_element(selector).await?;
        Ok(self.driver.get_value(&element).await?)
    }

    /// Text of the element matched by `selector`, such as a checked option.
    pub(super) async fn text_of(&self, selector: &str) -> DiaryResult<String> {
        Ok(self.driver.find_element(selector).await?.label().to_string())
    }

    /// Set both dates, through the datepicker when it cooperates and by
    /// writing the inputs otherwise.
    pub async fn set_date_range(&self, window: WeekWindow) -> DiaryResult<()> {
        if let Err(e) = self.pick_range(window).await {
            warn!("Datepicker failed ({}), writing dates directly", e);
            self.write_date(START_DATE, window.start).await?;
            self.write_date(END_DATE, window.end).await?;
        }
        info!("📅 날짜 설정: {}", window);
        Ok(())
    }

    async fn pick_range(&self, window: WeekWindow) -> DiaryResult<()> {
        self.pick_date(START_DATE, window.start).await?;
        self.pick_date(END_DATE, window.end).await
    }

    async fn pick_date(&self, input: &str, date: NaiveDate) -> DiaryResult<()> {
        let field = self.driver.find_element(input).await?;
        self.driver.click(&field).await?;
        self.pacer.pause(DelayKind::Select).await;

        let year = self.driver.find_element(PICKER_YEAR).await?;
        self.driver.set_value(&year, &date.year().to_string()).await?;
        self.pacer.pause(DelayKind::Input).await;

        let month = self.driver.find_element(PICKER_MONTH).await?;
        self.driver.set_value(&month, &date.month0().to_string()).await?;
        self.pacer.pause(DelayKind::Input).await;

        let day = date.day().to_string();
        let cell = self
            .driver
            .find_elements(PICKER_DAYS)
            .await?
            .into_iter()
            .find(|cell| cell.label() == day)
            .ok_or_else(|| UiError::ElementNotFound(format!("{} day {}", PICKER_DAYS, day)))?;
        self.driver.click(&cell).await?;
        self.pacer.pause(DelayKind::Select).await;
        Ok(())
    }

    async fn write_date(&self, input: &str, date: NaiveDate) -> DiaryResult<()> {
        let field = self.driver.find_element(input).await?;
        self.driver.set_value(&field, &format_date(date)).await?;
        self.pacer.pause(DelayKind::Input).await;
        Ok(())
    }

    /// Choose `option` in `select`, by value when it has one.
    async fn choose_option(&self, select: &Element, option: &Element) -> DiaryResult<()> {
        match option.value.as_deref().filter(|v| !v.is_empty()) {
            Some(value) => self.driver.set_value(select, value).await?,
            None => self.driver.click(option).await?,
        }
        Ok(())
    }

    /// Select the configured crop, or the first listed one when it is not
    /// offered. Returns the chosen label.
    pub async fn select_crop(&self) -> DiaryResult<String> {
        let select = self.driver.find_element(CROP_SELECT).await?;
        self.driver.click(&select).await?;
        self.pacer.pause(DelayKind::Select).await;

        let options = self.driver.find_elements(CROP_OPTIONS).await?;
        let crop = self.config.diary.crop.as_str();
        let option = options
            .iter()
            .find(|option| option.label().contains(crop))
            .or_else(|| options.first())
            .ok_or_else(|| UiError::ElementNotFound(CROP_OPTIONS.to_string()))?;
        if !option.label().contains(crop) {
            warn!("Crop {} not offered, using {}", crop, option.label());
        }

        self.choose_option(&select, option).await?;
        self.pacer.pause(DelayKind::ServerLoad).await;
        info!("🌾 품목 선택: {}", option.label());
        Ok(option.label().to_string())
    }

    pub async fn select_lands(&self) -> DiaryResult<Vec<String>> {
        self.pacer.pause(DelayKind::FastWait).await;
        let lands = self.check_all(LAND_BOXES).await?;
        info!("필지 선택: {}개", lands.len());
        Ok(lands)
    }

    pub async fn select_varieties(&self) -> DiaryResult<Vec<String>> {
        let varieties = self.check_all(VARIETY_BOXES).await?;
        info!("품종 선택: {}개", varieties.len());
        Ok(varieties)
    }

    /// Check every box under `selector`; returns the box values.
    async fn check_all(&self, selector: &str) -> DiaryResult<Vec<String>> {
        let boxes = self.driver.find_elements(selector).await?;
        if boxes.is_empty() {
            warn!("No checkboxes listed for {}", selector);
        }

        let mut values = Vec::with_capacity(boxes.len());
        for checkbox in &boxes {
            if !checkbox.checked {
                self.driver.click(checkbox).await?;
                self.pacer.pause(DelayKind::Input).await;
            }
            values.push(checkbox.value.clone().unwrap_or_default());
        }
        self.pacer.pause(DelayKind::ServerLoad).await;
        Ok(values)
    }

    /// Task steps on offer for the selected crop.
    pub async fn task_options(&self) -> DiaryResult<Vec<Element>> {
        self.driver.wait_for(TASK_SELECT, self.config.browser.wait()).await?;
        let options = self.driver.find_elements(TASK_OPTIONS).await?;
        let options = filter_task_options(options, &self.config.diary.excluded_tasks);
        debug!(
            "Task steps: {:?}",
            options.iter().map(|o| o.label()).collect::<Vec<_>>()
        );
        Ok(options)
    }

    pub async fn select_task(&self, option: &Element) -> DiaryResult<()> {
        let select = self.driver.find_element(TASK_SELECT).await?;
        self.choose_option(&select, option).await?;
        self.pacer.pause(DelayKind::ServerLoad).await;
        info!("작업단계 선택: {}", option.label());
        Ok(())
    }

    /// Select the task step labelled `label` again.
    pub(super) async fn reselect_task(&self, label: &str) -> DiaryResult<()> {
        let option = self
            .task_options()
            .await?
            .into_iter()
            .find(|option| option.label() == label)
            .ok_or_else(|| UiError::ElementNotFound(format!("{} {}", TASK_OPTIONS, label)))?;
        self.select_task(&option).await
    }

    /// Fill the quantity fields `task` requires. Failures are logged only.
    pub async fn fill_extra_fields(&self, task: &str) {
        for (selector, value) in extra_fields(task) {
            let result = async {
                let field = self.driver.find_element(selector).await?;
                self.driver.set_value(&field, &value).await
            }
            .await;
            match result {
                Ok(()) => debug!("{} = {}", selector, value),
                Err(e) => warn!("Could not fill {} for {}: {}", selector, task, e),
            }
            self.pacer.pause(DelayKind::Input).await;
        }
    }

    /// Weather shown on the form, when the widgets are filled in.
    pub async fn read_weather(&self) -> Option<Weather> {
        let condition = self.value_of(WEATHER_CONDITION).await.ok()?;
        if condition.trim().is_empty() {
            return None;
        }
        let low = self.value_of(WEATHER_LOW).await.ok()?;
        let high = self.value_of(WEATHER_HIGH).await.ok()?;
        let optional = |value: DiaryResult<String>| value.ok().filter(|v| !v.trim().is_empty());

        Some(Weather {
            condition: condition.trim().to_string(),
            low: low.trim().to_string(),
            high: high.trim().to_string(),
            rainfall: optional(self.value_of(WEATHER_RAINFALL).await),
            humidity: optional(self.value_of(WEATHER_HUMIDITY).await),
        })
    }

    pub async fn enter_content(&self, content: &str) -> DiaryResult<()> {
        let memo = self.driver.find_element(MEMO).await?;
        self.driver.set_value(&memo, content).await?;
        self.pacer.pause(DelayKind::Input).await;
        info!("📝 작업 내용 입력: {}자", content.chars().count());
        Ok(())
    }

    /// Click save and accept the confirmation dialogs that follow.
    ///
    /// Once the button is clicked the entry may already be stored, so dialog
    /// trouble is logged rather than returned.
    pub async fn submit(&self) -> DiaryResult<()> {
        let button = self.driver.find_element(SAVE_BUTTON).await?;
        self.driver.click(&button).await?;

        let mut accepted = 0;
        for _ in 0..MAX_DIALOGS {
            self.pacer.pause(DelayKind::ServerLoad).await;
            match self.driver.accept_pending_dialog().await {
                Ok(true) => accepted += 1,
                Ok(false) => {}
                Err(e) => warn!("Dialog after save: {}", e),
            }
        }
        info!("💾 영농일지 저장 (확인창 {}개)", accepted);
        Ok(())
    }
}
