//! Week loop against an in-memory portal.

mod common;

use std::fs;

use common::*;
use diary_core::{DiaryError, UiError};
use diary_runloop::{DiaryRunner, RunSummary};

#[tokio::test]
async fn test_february_run_writes_four_weeks() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::new();
    let mut runner = DiaryRunner::new(session(&page, config(dir.path()), schedule()));

    let summary = runner.run().await.unwrap();
    assert_eq!(
        summary,
        RunSummary {
            total: 4,
            completed: 4,
            skipped: 0,
            failed: 0
        }
    );

    let saved = page.saved();
    let ranges: Vec<(&str, &str)> = saved.iter().map(|s| (s.start.as_str(), s.end.as_str())).collect();
    assert_eq!(
        ranges,
        vec![
            ("2021-02-01", "2021-02-07"),
            ("2021-02-08", "2021-02-14"),
            ("2021-02-15", "2021-02-21"),
            ("2021-02-22", "2021-02-28"),
        ]
    );
    // Seeding starts in March; its period reaches back 15 days.
    assert_eq!(saved[1].task.as_deref(), Some("T05"));
    assert_eq!(saved[2].task.as_deref(), Some("T02"));
    assert_eq!(saved[3].task.as_deref(), Some("T02"));
}

#[tokio::test]
async fn test_run_resumes_after_logged_week() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("diary_log_20210301_090000.txt"),
        "2021-03-01T09:00:00 INFO ✅ 2021-02-01 ~ 2021-02-07 영농일지 등록 완료\n\
         2021-03-01T09:10:00 INFO ✅ 2021-02-08 ~ 2021-02-14 영농일지 등록 완료\n",
    )
    .unwrap();
    let page = FakePage::new();
    let mut runner = DiaryRunner::new(session(&page, config(dir.path()), schedule()));

    assert_eq!(runner.start_date(), date(2021, 2, 15));
    let summary = runner.run().await.unwrap();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.completed, 2);
    assert_eq!(page.saved()[0].start, "2021-02-15");
}

#[tokio::test]
async fn test_nothing_left_to_write() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("diary_log_20210301_090000.txt"),
        "✅ 2021-02-22 ~ 2021-02-28 영농일지 등록 완료\n",
    )
    .unwrap();
    let page = FakePage::new();
    let mut runner = DiaryRunner::new(session(&page, config(dir.path()), schedule()));

    let summary = runner.run().await.unwrap();
    assert_eq!(summary, RunSummary::default());
    assert!(page.with(|s| s.navigations.is_empty()));
}

#[tokio::test]
async fn test_failed_week_recovers_and_retries() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::new();
    page.fail("#selectCrops", vec![UiError::Script("select is disabled".into())]);
    let mut runner = DiaryRunner::new(session(&page, config(dir.path()), schedule()));

    let summary = runner.run().await.unwrap();
    assert_eq!(summary.completed, 4);
    assert_eq!(summary.failed, 0);
    assert_eq!(page.saved()[0].start, "2021-02-01");
    // Login, first form visit, then the recovery.
    let to_main = page.with(|s| s.navigations.iter().filter(|u| *u == MAIN_URL).count());
    assert_eq!(to_main, 2);
}

#[tokio::test]
async fn test_week_failing_twice_is_counted_and_skipped_over() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::new();
    page.fail(
        "#selectCrops",
        vec![
            UiError::Script("select is disabled".into()),
            UiError::Script("select is disabled".into()),
        ],
    );
    let mut runner = DiaryRunner::new(session(&page, config(dir.path()), schedule()));

    let summary = runner.run().await.unwrap();
    assert_eq!(summary.completed, 3);
    assert_eq!(summary.failed, 1);
    assert_eq!(page.saved()[0].start, "2021-02-08");
}

#[tokio::test]
async fn test_skipped_weeks_are_counted() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::new();
    page.with(|s| s.tasks.truncate(1));
    let mut runner = DiaryRunner::new(session(&page, config(dir.path()), schedule()));

    let summary = runner.run().await.unwrap();
    assert_eq!(summary.skipped, 4);
    assert_eq!(summary.processed(), 4);
    assert!(page.saved().is_empty());
}

#[tokio::test]
async fn test_rejected_login_stops_run() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::new();
    let mut config = config(dir.path());
    config.account.password = "wrong".to_string();
    let mut runner = DiaryRunner::new(session(&page, config, schedule()));

    let err = runner.run().await.unwrap_err();
    assert!(matches!(err, DiaryError::Fatal(_)), "{:?}", err);
    assert!(page.saved().is_empty());
}

#[tokio::test]
async fn test_closed_browser_stops_run() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::new();
    page.fail("#memo", vec![UiError::SessionClosed]);
    let mut runner = DiaryRunner::new(session(&page, config(dir.path()), schedule()));

    let err = runner.run().await.unwrap_err();
    assert!(err.is_fatal());
    assert!(page.saved().is_empty());
}

#[tokio::test]
async fn test_run_once_writes_one_window() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::new();
    let mut runner = DiaryRunner::new(session(&page, config(dir.path()), schedule()));

    let summary = runner.run_once(date(2021, 3, 15)).await.unwrap();
    assert_eq!(summary.total, 1);
    assert_eq!(summary.completed, 1);

    let saved = page.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!((saved[0].start.as_str(), saved[0].end.as_str()), ("2021-03-15", "2021-03-21"));
    assert_eq!(saved[0].task.as_deref(), Some("T02"));
}
