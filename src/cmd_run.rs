//! Run and plan commands.

use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use tracing::{error, info, warn};

use diary_browser::CdpDriver;
use diary_config::{DiaryConfig, ValidationWarning};
use diary_core::progress::resume_point;
use diary_core::{ScheduleStore, UiDriver, WeekWindows};
use diary_generator::ContentGenerator;
use diary_runloop::{DiaryRunner, DiarySession, RunSummary};

/// Attach to Chrome and write the configured range, or the single week
/// starting on `once`.
///
/// Ctrl-C or SIGTERM stops the run at the next await. The browser tab is
/// released on every exit path.
pub(crate) async fn run(
    config: DiaryConfig,
    warnings: Vec<ValidationWarning>,
    once: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let (guard, log_path) = crate::logging::init_tracing(&config.logging)
        .with_context(|| format!("Failed to open diary log in {}", config.logging.dir.display()))?;
    info!("📝 로그 파일: {}", log_path.display());
    for warning in &warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    let endpoint = config.browser.endpoint.clone();
    let driver = CdpDriver::connect(&endpoint)
        .await
        .with_context(|| format!("Could not attach to Chrome at {}", endpoint))?;
    let driver: Arc<dyn UiDriver> = Arc::new(driver);
    info!("🌐 브라우저 연결 완료: {}", endpoint);

    let schedule = ScheduleStore::load(&config.schedule.path);
    let generator = ContentGenerator::from_config(&config.generator);
    if generator.external_enabled() {
        info!("🤖 외부 문장 생성 사용 ({})", config.generator.model);
    }

    let session = DiarySession::new(driver.clone(), Arc::new(config), Arc::new(generator), Arc::new(schedule));
    let mut runner = DiaryRunner::new(session);

    let outcome = tokio::select! {
        result = async {
            match once {
                Some(date) => runner.run_once(date).await,
                None => runner.run().await,
            }
        } => Some(result),
        _ = shutdown_signal() => None,
    };

    if let Err(e) = driver.close().await {
        warn!("Failed to release the browser tab: {}", e);
    }

    let result = match outcome {
        Some(Ok(summary)) => {
            report(&summary);
            Ok(())
        }
        Some(Err(e)) => {
            error!("🛑 실행 중단: {}", e);
            Err(e.into())
        }
        None => {
            warn!("⏹️ 종료 신호를 받아 중단합니다");
            Ok(())
        }
    };

    // Flush the diary log before exiting.
    drop(guard);
    result
}

fn report(summary: &RunSummary) {
    info!(
        "📊 결과: 전체 {} / 완료 {} / 건너뜀 {} / 실패 {}",
        summary.total, summary.completed, summary.skipped, summary.failed
    );
}

/// Print the weeks a run would write from its resume point.
pub(crate) fn plan(config: &DiaryConfig) {
    let diary = &config.diary;
    let resume = resume_point(
        diary.start_date,
        &config.logging.dir,
        &config.logging.file_prefix,
        diary.interval_days,
    );
    let start = resume.start();
    if start != diary.start_date {
        println!("Resuming after logged progress: {} -> {}", diary.start_date, start);
    }

    let total = WeekWindows::total(start, diary.end_date, diary.interval_days);
    if total == 0 {
        println!("Nothing to write up to {}.", diary.end_date);
        return;
    }

    println!("{:<6} {}", "WEEK", "RANGE");
    println!("{}", "-".repeat(32));
    for (i, window) in WeekWindows::new(start, diary.end_date, diary.interval_days).enumerate() {
        println!("{:<6} {}", i + 1, window);
    }
    println!("{} week(s), crop {}", total, diary.crop);
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
