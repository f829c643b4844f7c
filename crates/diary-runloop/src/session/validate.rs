//! Pre-save check of the six required fields.

use std::fmt;

use diary_core::{DiaryError, DiaryResult};
use tracing::{debug, info, warn};

use super::draft::DiaryDraft;
use super::selectors::*;
use super::DiarySession;
use crate::pacing::DelayKind;

/// Memo text shorter than this counts as missing.
const MIN_CONTENT_CHARS: usize = 10;

/// A required field of the diary form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    DateRange,
    Crop,
    Land,
    Variety,
    TaskStep,
    Content,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::DateRange,
        FormField::Crop,
        FormField::Land,
        FormField::Variety,
        FormField::TaskStep,
        FormField::Content,
    ];
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormField::DateRange => write!(f, "날짜"),
            FormField::Crop => write!(f, "품목"),
            FormField::Land => write!(f, "필지"),
            FormField::Variety => write!(f, "품종"),
            FormField::TaskStep => write!(f, "작업 단계"),
            FormField::Content => write!(f, "작업 내용"),
        }
    }
}

fn join(fields: &[FormField]) -> String {
    fields.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

impl DiarySession {
    /// Required fields that are empty on the form right now. A field that
    /// cannot be read counts as missing.
    pub async fn missing_fields(&self) -> Vec<FormField> {
        let mut missing = Vec::new();
        for field in FormField::ALL {
            match self.field_present(field).await {
                Ok(true) => {}
                Ok(false) => missing.push(field),
                Err(e) => {
                    debug!("Checking {} failed: {}", field, e);
                    missing.push(field);
                }
            }
        }
        missing
    }

    async fn field_present(&self, field: FormField) -> DiaryResult<bool> {
        let present = match field {
            FormField::DateRange => {
                let start = self.value_of(START_DATE).await?;
                let end = self.value_of(END_DATE).await?;
                !start.is_empty() && !end.is_empty()
            }
            FormField::Crop => {
                let crop = self.text_of(CROP_SELECTED).await?;
                !crop.is_empty() && crop != CROP_PLACEHOLDER
            }
            FormField::Land => !self.driver.find_elements(LAND_CHECKED).await?.is_empty(),
            FormField::Variety => !self.driver.find_elements(VARIETY_CHECKED).await?.is_empty(),
            FormField::TaskStep => {
                let task = self.text_of(TASK_SELECTED).await?;
                !task.is_empty() && task != TASK_PLACEHOLDER
            }
            FormField::Content => {
                let memo = self.value_of(MEMO).await?;
                memo.trim().chars().count() >= MIN_CONTENT_CHARS
            }
        };
        Ok(present)
    }

    /// Repeat the step behind each missing field using what the draft holds.
    /// Failures are logged; the next check decides.
    pub async fn retry_input_fields(&self, missing: &[FormField], draft: &DiaryDraft) {
        info!("누락된 항목 재설정: {}", join(missing));

        for field in missing {
            let result = match field {
                FormField::DateRange => self.set_date_range(draft.window).await,
                FormField::Crop => self.select_crop().await.map(|_| ()),
                FormField::Land => self.select_lands().await.map(|_| ()),
                FormField::Variety => self.select_varieties().await.map(|_| ()),
                FormField::TaskStep => match draft.task_label() {
                    Some(label) => self.reselect_task(label).await,
                    None => Ok(()),
                },
                FormField::Content => match &draft.content {
                    Some(content) => self.enter_content(content).await,
                    None => Ok(()),
                },
            };
            if let Err(e) = result {
                warn!("{} 재설정 실패: {}", field, e);
            }
            self.pacer.pause(DelayKind::Input).await;
        }
    }

    /// Check the form up to `diary.validation_attempts` times, re-filling
    /// missing fields in between.
    ///
    /// Returns what is still missing after the last check; the caller saves
    /// either way.
    pub async fn validate(&self, draft: &DiaryDraft) -> Vec<FormField> {
        let attempts = self.config.diary.validation_attempts.max(1);
        let mut attempt = 1;

        loop {
            let missing = self.missing_fields().await;
            if missing.is_empty() {
                info!("✅ 모든 입력 항목이 올바르게 설정되었습니다");
                return missing;
            }

            if attempt >= attempts {
                let gap = DiaryError::ValidationGap {
                    missing: missing.iter().map(ToString::to_string).collect(),
                };
                warn!("❌ {} (최대 재시도 {}회 초과, 저장을 진행합니다)", gap, attempts);
                return missing;
            }

            warn!("⚠️ 누락된 항목: {} (재시도 {}/{})", join(&missing), attempt, attempts);
            self.retry_input_fields(&missing, draft).await;
            attempt += 1;
        }
    }
}
