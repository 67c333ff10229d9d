//! Rotating file sink backed by `tracing-appender`

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use wd_shared::RotationPolicy;

use super::error::{LogError, LogResult};
use super::format::RecordFormatter;
use super::level::LogLevel;
use super::record::LogRecord;

const FILE_SUFFIX: &str = "log";

/// Appends formatted records at or above `min_level` to a rotating file
///
/// Files are named `<prefix>.log` when rotation is disabled and
/// `<prefix>.<period>.log` otherwise. At most `max_files` dated siblings of
/// this sink are kept.
pub struct RotatingSink {
    directory: PathBuf,
    prefix: String,
    rotation: RotationPolicy,
    max_files: usize,
    min_level: LogLevel,
    formatter: Box<dyn RecordFormatter>,
    appender: RollingFileAppender,
    period: Mutex<Option<String>>,
}

impl RotatingSink {
    pub fn open(
        directory: &Path,
        prefix: &str,
        rotation: RotationPolicy,
        max_files: usize,
        min_level: LogLevel,
        formatter: Box<dyn RecordFormatter>,
    ) -> LogResult<Self> {
        let appender = RollingFileAppender::builder()
            .rotation(as_rotation(rotation))
            .filename_prefix(prefix)
            .filename_suffix(FILE_SUFFIX)
            .build(directory)
            .map_err(|e| LogError::Appender {
                path: directory.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(Self {
            directory: directory.to_path_buf(),
            prefix: prefix.to_string(),
            rotation,
            max_files,
            min_level,
            formatter,
            appender,
            period: Mutex::new(None),
        })
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn accepts(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Path of the file currently written to
    pub fn current_path(&self) -> PathBuf {
        match period_key(self.rotation, Utc::now()) {
            Some(period) => self
                .directory
                .join(format!("{}.{}.{}", self.prefix, period, FILE_SUFFIX)),
            None => self.directory.join(format!("{}.{}", self.prefix, FILE_SUFFIX)),
        }
    }

    /// Formats and appends a record, ignoring records below the threshold
    pub fn write(&self, record: &LogRecord) -> io::Result<()> {
        if !self.accepts(record.level) {
            return Ok(());
        }

        let entry = self.formatter.format(record);
        let mut writer = self.appender.make_writer();
        writer.write_all(entry.as_bytes())?;
        writer.flush()?;

        self.enforce_retention();
        Ok(())
    }

    /// Runs the sibling cap once per rotation period
    fn enforce_retention(&self) {
        let Some(period) = period_key(self.rotation, Utc::now()) else {
            return;
        };

        let mut current = self.period.lock().unwrap_or_else(PoisonError::into_inner);
        if current.as_deref() == Some(period.as_str()) {
            return;
        }
        *current = Some(period);
        drop(current);

        match retain_newest(&self.directory, &self.prefix, self.max_files) {
            Ok(0) => {}
            Ok(removed) => debug!(prefix = %self.prefix, removed, "removed rotated log files"),
            Err(e) => warn!(prefix = %self.prefix, error = %e, "failed to enforce rotated file cap"),
        }
    }
}

fn as_rotation(policy: RotationPolicy) -> Rotation {
    match policy {
        RotationPolicy::Never => Rotation::NEVER,
        RotationPolicy::Minutely => Rotation::MINUTELY,
        RotationPolicy::Hourly => Rotation::HOURLY,
        RotationPolicy::Daily => Rotation::DAILY,
    }
}

/// Period component of the file name, `None` when rotation is disabled
pub(crate) fn period_key(policy: RotationPolicy, now: DateTime<Utc>) -> Option<String> {
    let format = match policy {
        RotationPolicy::Never => return None,
        RotationPolicy::Minutely => "%Y-%m-%d-%H-%M",
        RotationPolicy::Hourly => "%Y-%m-%d-%H",
        RotationPolicy::Daily => "%Y-%m-%d",
    };
    Some(now.format(format).to_string())
}

/// Deletes the oldest `<prefix>.<period>.log` files beyond `max_files`
///
/// Only names whose middle part is a period stamp count, so `api` never
/// touches `api-errors.<period>.log`.
pub(crate) fn retain_newest(directory: &Path, prefix: &str, max_files: usize) -> io::Result<usize> {
    let mut dated: Vec<(String, PathBuf)> = fs::read_dir(directory)?
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            let period = name
                .strip_prefix(prefix)?
                .strip_prefix('.')?
                .strip_suffix(FILE_SUFFIX)?
                .strip_suffix('.')?;
            is_period_stamp(period).then(|| (period.to_string(), entry.path()))
        })
        .collect();

    if dated.len() <= max_files {
        return Ok(0);
    }

    // Stamps are zero-padded, so lexical order is chronological.
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    let mut removed = 0;
    for (_, path) in dated.into_iter().skip(max_files) {
        match fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove rotated log file"),
        }
    }
    Ok(removed)
}

fn is_period_stamp(value: &str) -> bool {
    matches!(value.len(), 10 | 13 | 16)
        && value
            .chars()
            .enumerate()
            .all(|(i, c)| if matches!(i, 4 | 7 | 10 | 13) { c == '-' } else { c.is_ascii_digit() })
}
