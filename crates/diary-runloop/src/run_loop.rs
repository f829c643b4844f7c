//! Week-by-week run over the configured date range.

use chrono::{Days, NaiveDate};
use diary_core::progress::{completion_line, resume_point, ResumePoint};
use diary_core::{DiaryError, DiaryResult, WeekWindow, WeekWindows};
use tracing::{error, info, warn};

use crate::pacing::DelayKind;
use crate::session::{DiarySession, WindowOutcome};

/// A progress percentage is logged after this many windows.
const PROGRESS_EVERY: usize = 4;

/// Tally of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn processed(&self) -> usize {
        self.completed + self.skipped + self.failed
    }

    /// Processed windows as a percentage of the total.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.processed() as f64 / self.total as f64 * 100.0
        }
    }

    /// Percentage line due after the `index`-th window, every
    /// [`PROGRESS_EVERY`] windows.
    pub fn progress_report(&self, index: usize) -> Option<String> {
        (index > 0 && index % PROGRESS_EVERY == 0)
            .then(|| format!("📊 진행률: {:.1}% ({}/{})", self.percent(), index, self.total))
    }
}

/// Runs a [`DiarySession`] over every window of the range.
///
/// A window that fails gets exactly one recovery and one retry; after that
/// the run moves on. Only fatal errors end the run early.
pub struct DiaryRunner {
    session: DiarySession,
}

impl DiaryRunner {
    pub fn new(session: DiarySession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &DiarySession {
        &self.session
    }

    /// First window start, moved past the last completion marker in the
    /// diary logs when there is one.
    pub fn start_date(&self) -> NaiveDate {
        let config = self.session.config();
        let diary = &config.diary;
        match resume_point(
            diary.start_date,
            &config.logging.dir,
            &config.logging.file_prefix,
            diary.interval_days,
        ) {
            ResumePoint::Resumed { last_completed, start } => {
                info!("📂 마지막 완료 주: {}, {}부터 이어서 진행합니다", last_completed, start);
                start
            }
            ResumePoint::Configured(start) => start,
        }
    }

    /// Write every window from the resume point to the configured end date.
    pub async fn run(&mut self) -> DiaryResult<RunSummary> {
        let config = self.session.config().clone();
        let interval = config.diary.interval_days;
        let start = self.start_date();
        let end = config.diary.end_date;

        if start > end {
            info!("등록할 기간이 없습니다 ({} 이후 {}까지)", start, end);
            return Ok(RunSummary::default());
        }

        let total = WeekWindows::total(start, end, interval);
        info!("🌾 영농일지 등록 시작: {} ~ {} ({}일 간격, {}주)", start, end, interval, total);

        self.open().await?;
        let summary = self.process(WeekWindows::new(start, end, interval), total).await?;

        info!(
            "🎉 모든 영농일지 등록 완료! (완료 {}, 건너뜀 {}, 실패 {})",
            summary.completed, summary.skipped, summary.failed
        );
        Ok(summary)
    }

    /// Write the single window starting on `date`.
    pub async fn run_once(&mut self, date: NaiveDate) -> DiaryResult<RunSummary> {
        let interval = self.session.config().diary.interval_days.max(1);
        let end = date
            .checked_add_days(Days::new(u64::from(interval - 1)))
            .unwrap_or(date);
        let window = WeekWindow::new(date, end);
        info!("🧪 테스트 모드: {}", window);

        self.open().await?;
        self.process(std::iter::once(window), 1).await
    }

    /// Log in and open the diary form.
    async fn open(&self) -> DiaryResult<()> {
        let session = &self.session;

        session
            .retry()
            .run("login", || session.login())
            .await
            .map_err(|e| match e {
                DiaryError::Fatal(_) => e,
                e => DiaryError::Fatal(format!("Login failed: {}", e)),
            })?;

        // The first window retries this itself.
        if let Err(e) = session.retry().run("open diary page", || session.ensure_detail_page()).await {
            if e.is_fatal() {
                return Err(e);
            }
            warn!("Could not open the diary form yet: {}", e);
        }
        Ok(())
    }

    async fn process(
        &mut self,
        windows: impl Iterator<Item = WeekWindow>,
        total: usize,
    ) -> DiaryResult<RunSummary> {
        let mut summary = RunSummary {
            total,
            ..RunSummary::default()
        };

        for (i, window) in windows.enumerate() {
            let index = i + 1;
            info!("📅 진행률: {}/{} ({})", index, total, window);

            self.process_window(window, &mut summary).await?;

            if let Some(report) = summary.progress_report(index) {
                info!("{}", report);
            }
            if index < total {
                self.session.pacer().pause(DelayKind::BetweenWindows).await;
            }
        }
        Ok(summary)
    }

    /// One window with its recovery cycle. Only fatal errors escape.
    async fn process_window(&mut self, window: WeekWindow, summary: &mut RunSummary) -> DiaryResult<()> {
        let outcome = match self.session.write_window(window).await {
            Err(e) if !e.is_fatal() => {
                warn!("❌ {} 등록 중 오류 발생: {}", window, e);
                match self.session.recover().await {
                    Ok(()) => self.session.write_window(window).await,
                    Err(recovery) => Err(recovery),
                }
            }
            other => other,
        };

        match outcome {
            Ok(WindowOutcome::Submitted { .. }) => {
                info!("{}", completion_line(&window));
                summary.completed += 1;
            }
            Ok(WindowOutcome::Skipped) => summary.skipped += 1,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                error!("❌ {} 복구 실패, 다음 주로 진행... ({})", window, e);
                self.session.reset_selection();
                summary.failed += 1;
            }
        }
        Ok(())
    }
}
