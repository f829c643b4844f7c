//! Resume cursor over a directory of rotated diary logs.

use std::fs;

use chrono::NaiveDate;
use diary_core::progress::{find_last_completed, log_files, resume_point, ResumePoint};
use diary_core::{WeekWindow, WeekWindows};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_newest_file_with_marker_decides() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("diary_log_20240501_090000.txt"),
        "✅ 2021-03-01 ~ 2021-03-07 영농일지 등록 완료\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("diary_log_20240502_090000.txt"),
        "✅ 2021-04-05 ~ 2021-04-11 영농일지 등록 완료\n❌ 2021-04-12 ~ 2021-04-18 복구 실패, 다음 주로 진행...\n",
    )
    .unwrap();
    // The file opened by the current run holds no marker yet.
    fs::write(dir.path().join("diary_log_20240503_090000.txt"), "").unwrap();
    // Files from other tools are ignored.
    fs::write(
        dir.path().join("test_diary_log_20240504_090000.txt"),
        "✅ 2023-01-02 ~ 2023-01-08 영농일지 등록 완료\n",
    )
    .unwrap();

    let files = log_files(dir.path(), "diary_log").unwrap();
    assert_eq!(files.len(), 3);
    assert!(files[0].ends_with("diary_log_20240503_090000.txt"));

    let last = find_last_completed(dir.path(), "diary_log").unwrap();
    assert_eq!(last, Some(date(2021, 4, 5)));

    let point = resume_point(date(2021, 2, 1), dir.path(), "diary_log", 7);
    assert_eq!(point.start(), date(2021, 4, 12));
}

#[test]
fn test_rotated_file_sorts_after_its_parent() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("diary_log_20240501_090000.txt"),
        "✅ 2021-02-01 ~ 2021-02-07 영농일지 등록 완료\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("diary_log_20240501_090000_1.txt"),
        "✅ 2021-02-08 ~ 2021-02-14 영농일지 등록 완료\n",
    )
    .unwrap();

    let point = resume_point(date(2021, 2, 1), dir.path(), "diary_log", 7);
    assert_eq!(
        point,
        ResumePoint::Resumed {
            last_completed: date(2021, 2, 8),
            start: date(2021, 2, 15),
        }
    );
}

#[test]
fn test_resumed_windows_continue_the_grid() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("diary_log_20240501_090000.txt"),
        "✅ 2021-02-08 ~ 2021-02-14 영농일지 등록 완료\n",
    )
    .unwrap();

    let start = resume_point(date(2021, 2, 1), dir.path(), "diary_log", 7).start();
    let windows: Vec<_> = WeekWindows::new(start, date(2021, 2, 28), 7).collect();
    assert_eq!(
        windows,
        vec![
            WeekWindow::new(date(2021, 2, 15), date(2021, 2, 21)),
            WeekWindow::new(date(2021, 2, 22), date(2021, 2, 28)),
        ]
    );
}

#[test]
fn test_tenth_part_is_newer_than_ninth() {
    let dir = tempfile::tempdir().unwrap();
    for part in 1..=10 {
        fs::write(
            dir.path().join(format!("diary_log_20240501_090000_{}.txt", part)),
            format!("✅ 2021-01-{:02} ~ 2021-01-{:02} 영농일지 등록 완료\n", part, part),
        )
        .unwrap();
    }

    let files = log_files(dir.path(), "diary_log").unwrap();
    assert!(files[0].ends_with("diary_log_20240501_090000_10.txt"));
    assert!(files[1].ends_with("diary_log_20240501_090000_9.txt"));

    let last = find_last_completed(dir.path(), "diary_log").unwrap();
    assert_eq!(last, Some(date(2021, 1, 10)));
}
