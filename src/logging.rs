//! Console and diary-log tracing setup.
//!
//! Every run writes to `{dir}/{prefix}_YYYYMMDD_HHMMSS.txt`. When a file
//! passes the size limit the writer continues in `..._1.txt`, `..._2.txt`
//! and so on. Completion markers in these files drive resuming.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use diary_config::LoggingConfig;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Append-only log file that starts a new part once `max_bytes` is reached.
pub(crate) struct RotatingFile {
    dir: PathBuf,
    stem: String,
    max_bytes: u64,
    part: u32,
    written: u64,
    file: File,
}

impl RotatingFile {
    /// Open a fresh log file named after the current local time.
    pub(crate) fn create(dir: &Path, prefix: &str, max_bytes: u64) -> io::Result<Self> {
        let stem = format!("{}_{}", prefix, Local::now().format("%Y%m%d_%H%M%S"));
        Self::with_stem(dir, stem, max_bytes)
    }

    fn with_stem(dir: &Path, stem: String, max_bytes: u64) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let file = open_append(&dir.join(format!("{}.txt", stem)))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            stem,
            max_bytes,
            part: 0,
            written: 0,
            file,
        })
    }

    /// Path of the part currently written to.
    pub(crate) fn path(&self) -> PathBuf {
        part_path(&self.dir, &self.stem, self.part)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        self.part += 1;
        self.file = open_append(&self.path())?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let incoming = buf.len() as u64;
        if self.max_bytes > 0 && self.written > 0 && self.written + incoming > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn part_path(dir: &Path, stem: &str, part: u32) -> PathBuf {
    if part == 0 {
        dir.join(format!("{}.txt", stem))
    } else {
        dir.join(format!("{}_{}.txt", stem, part))
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Console and file layers over a registry.
///
/// The console follows `RUST_LOG` or `logging.level`. The file layer never
/// drops below `info`, so completion markers always reach the diary log
/// that resuming reads back.
pub(crate) fn build_subscriber(
    config: &LoggingConfig,
) -> io::Result<(impl Subscriber + Send + Sync + 'static, WorkerGuard, PathBuf)> {
    let file = RotatingFile::create(&config.dir, &config.file_prefix, config.max_file_bytes())?;
    let path = file.path();
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let file_filter = file_level(&config.level);

    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(true).with_filter(console_filter))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_filter(file_filter),
        );

    Ok((subscriber, guard, path))
}

/// The configured level, raised to `info` when it is stricter.
fn file_level(level: &str) -> LevelFilter {
    level
        .parse::<LevelFilter>()
        .map_or(LevelFilter::INFO, |configured| configured.max(LevelFilter::INFO))
}

/// Install the console and file layers.
///
/// The returned guard flushes the file writer when dropped, so it must live
/// until the run ends.
pub(crate) fn init_tracing(config: &LoggingConfig) -> io::Result<(WorkerGuard, PathBuf)> {
    let (subscriber, guard, path) = build_subscriber(config)?;
    subscriber.init();
    Ok((guard, path))
}
