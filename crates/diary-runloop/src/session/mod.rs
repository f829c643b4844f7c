//! One diary form, filled and submitted.
//!
//! [`DiarySession`] owns the UI driver for the whole run. Each call to
//! [`DiarySession::write_window`] walks a fresh [`StateTracker`] from
//! `Navigating` to `Submitted`, wrapping every UI step in the shared
//! [`RetryPolicy`].

mod draft;
mod form;
mod navigation;
pub(crate) mod selectors;
mod state;
mod validate;

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use diary_config::DiaryConfig;
use diary_core::{match_task, DiaryError, DiaryResult, ScheduleEntry, ScheduleStore, UiDriver, WeekWindow};
use diary_generator::ContentGenerator;
use rand::seq::IndexedRandom;
use tracing::{debug, info, warn};

use crate::pacing::Pacer;
use crate::retry::RetryPolicy;

pub use draft::DiaryDraft;
pub use form::extra_fields;
pub use state::{InvalidTransition, SessionState, StateTracker};
pub use validate::FormField;

/// How a window ended without error.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowOutcome {
    /// Saved. `missing` lists fields that were still empty when the
    /// validation attempts ran out.
    Submitted {
        draft: DiaryDraft,
        missing: Vec<FormField>,
    },
    /// No task step was left to choose from.
    Skipped,
}

/// Drives the diary form for one window at a time.
pub struct DiarySession {
    driver: Arc<dyn UiDriver>,
    config: Arc<DiaryConfig>,
    generator: Arc<ContentGenerator>,
    schedule: Arc<ScheduleStore>,
    pacer: Pacer,
    retry: RetryPolicy,
    /// Crop, land and variety are still selected from the last submission.
    selection_ready: bool,
}

impl DiarySession {
    pub fn new(
        driver: Arc<dyn UiDriver>,
        config: Arc<DiaryConfig>,
        generator: Arc<ContentGenerator>,
        schedule: Arc<ScheduleStore>,
    ) -> Self {
        let pacer = Pacer::from_config(&config.pacing);
        Self {
            driver,
            config,
            generator,
            schedule,
            pacer,
            retry: RetryPolicy::default(),
            selection_ready: false,
        }
    }

    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn driver(&self) -> &Arc<dyn UiDriver> {
        &self.driver
    }

    pub fn config(&self) -> &Arc<DiaryConfig> {
        &self.config
    }

    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Forget the previous selection so the next window selects again.
    pub fn reset_selection(&mut self) {
        self.selection_ready = false;
    }

    /// Fill and submit the diary form for `window`.
    pub async fn write_window(&mut self, window: WeekWindow) -> DiaryResult<WindowOutcome> {
        info!("=== {} 영농일지 등록 시작 ===", window);

        let reuse = self.config.diary.reuse_selection && self.selection_ready;
        let mut tracker = StateTracker::new(reuse);
        let result = self.fill_and_submit(window, &mut tracker).await;

        match &result {
            Ok(WindowOutcome::Submitted { .. }) => self.selection_ready = true,
            Ok(WindowOutcome::Skipped) => {}
            Err(e) => {
                tracker.fail();
                self.selection_ready = false;
                debug!("Session for {} failed after {:?}: {}", window, tracker.history(), e);
            }
        }
        result
    }

    async fn fill_and_submit(
        &self,
        window: WeekWindow,
        tracker: &mut StateTracker,
    ) -> DiaryResult<WindowOutcome> {
        let mut draft = DiaryDraft::new(window, self.config.diary.crop.clone());

        self.step(tracker, "open diary page", || self.ensure_detail_page())
            .await?;
        self.step(tracker, "set date range", || self.set_date_range(window))
            .await?;
        tracker.advance(SessionState::RangeSet)?;

        if tracker.can_reuse() {
            info!("Keeping crop, land and variety from the previous window");
            tracker.advance(SessionState::VarietySelected)?;
        } else {
            draft.crop = self.step(tracker, "select crop", || self.select_crop()).await?;
            tracker.advance(SessionState::CropSelected)?;
            draft.lands = self.step(tracker, "select lands", || self.select_lands()).await?;
            tracker.advance(SessionState::LandSelected)?;
            draft.varieties = self
                .step(tracker, "select varieties", || self.select_varieties())
                .await?;
            tracker.advance(SessionState::VarietySelected)?;
        }

        let options = self.step(tracker, "read task steps", || self.task_options()).await?;
        if options.is_empty() {
            warn!("⚠️ {} 해당 작업 없음 (건너뜀)", window);
            return Ok(WindowOutcome::Skipped);
        }
        let labels: Vec<&str> = options.iter().map(|o| o.label()).collect();

        let scheduled = self.pick_scheduled(window.start);
        let matched = match &scheduled {
            Some(entry) => {
                info!("🎲 선택된 작업: {} ({})", entry.task_name, entry.period());
                match_task(&entry.task_name, &labels)
            }
            None => {
                info!("⚠️ {}에 해당하는 작업이 없습니다. 기본 관리 작업으로 등록합니다.", window);
                form::basic_task(&labels)
            }
        }
        .ok_or_else(|| DiaryError::session(tracker.state(), "no task step to match"))?;
        info!("Task step: {} ({:?})", matched.label, matched.rule);

        let option = &options[matched.index];
        self.step(tracker, "select task step", || self.select_task(option))
            .await?;
        draft.scheduled_task = scheduled.map(|entry| entry.task_name);
        draft.matched_task = Some(matched);
        tracker.advance(SessionState::TaskSelected)?;

        if let Some(label) = draft.task_label() {
            self.fill_extra_fields(label).await;
        }
        let content = self.compose_content(&draft).await;
        self.step(tracker, "enter content", || self.enter_content(&content))
            .await?;
        draft.content = Some(content);
        tracker.advance(SessionState::ContentEntered)?;

        tracker.advance(SessionState::Validating)?;
        let missing = self.validate(&draft).await;
        self.step(tracker, "save diary", || self.submit()).await?;
        tracker.advance(SessionState::Submitted)?;

        Ok(WindowOutcome::Submitted { draft, missing })
    }

    /// Run one UI step under the retry policy. Whatever still fails is
    /// reported as a session failure at the current state.
    async fn step<F, Fut, T>(&self, tracker: &StateTracker, label: &str, operation: F) -> DiaryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = DiaryResult<T>>,
    {
        self.retry
            .run(label, operation)
            .await
            .map_err(|e| abandon(tracker.state(), label, e))
    }

    /// A random schedule entry covering `date`.
    fn pick_scheduled(&self, date: NaiveDate) -> Option<ScheduleEntry> {
        let entries = self.schedule.tasks_for(date, self.config.schedule.tolerance_days);
        debug!("{} scheduled task(s) around {}", entries.len(), date);
        entries.choose(&mut rand::rng()).map(|entry| (*entry).clone())
    }

    async fn compose_content(&self, draft: &DiaryDraft) -> String {
        let weather = self.read_weather().await;
        match &draft.scheduled_task {
            Some(task) => {
                let text = self
                    .generator
                    .generate(
                        task,
                        &self.config.diary.crop,
                        self.generator.external_enabled(),
                        Some(draft.window.start),
                    )
                    .await;
                match &weather {
                    Some(weather) => weather.apply_to(&text),
                    None => text,
                }
            }
            None => self.generator.generate_basic(draft.window.start, weather.as_ref()).await,
        }
    }
}

/// Fatal errors pass through; everything else abandons the session.
fn abandon(state: SessionState, label: &str, error: DiaryError) -> DiaryError {
    if error.is_fatal() || matches!(error, DiaryError::Session { .. }) {
        error
    } else {
        DiaryError::session(state, format!("{}: {}", label, error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diary_core::UiError;

    #[test]
    fn test_abandon_wraps_ui_errors() {
        let err = abandon(
            SessionState::CropSelected,
            "select lands",
            UiError::Timeout("#checkLand".into()).into(),
        );
        assert_eq!(
            err.to_string(),
            "Session failed at crop_selected: select lands: Timed out waiting for #checkLand"
        );
    }

    #[test]
    fn test_abandon_keeps_fatal() {
        let err = abandon(SessionState::Navigating, "open diary page", UiError::SessionClosed.into());
        assert!(matches!(err, DiaryError::Ui(UiError::SessionClosed)));
    }
}
