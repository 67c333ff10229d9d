//! Log directory maintenance

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, warn};
use wd_shared::utils::format_bytes;

const SECONDS_PER_DAY: u64 = 86_400;

/// Metadata of a log file found by [`list_log_files`]
#[derive(Debug, Clone, Serialize)]
pub struct LogFileInfo {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub size_human: String,
    pub created: Option<DateTime<Local>>,
    pub modified: DateTime<Local>,
    /// Whole days since last modification
    pub age_days: u64,
}

/// Deletes log files in `dir` last modified more than `retention_days` ago
///
/// Matches `<dir>/*.log*`, which covers rotated siblings. Returns the number
/// of files actually removed; a missing directory is not an error.
pub fn prune_older_than(dir: &Path, retention_days: u32) -> io::Result<usize> {
    if !dir.is_dir() {
        return Ok(0);
    }

    let cutoff = SystemTime::now()
        .checked_sub(Duration::from_secs(u64::from(retention_days) * SECONDS_PER_DAY))
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut removed = 0;
    for path in log_files(dir)? {
        let Ok(metadata) = fs::metadata(&path) else {
            continue;
        };
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        if !metadata.is_file() || modified >= cutoff {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => warn!(path = %path.display(), error = %e, "failed to delete old log file"),
        }
    }

    debug!(directory = %dir.display(), retention_days, removed, "pruned log directory");
    Ok(removed)
}

/// Lists log files in `dir`, most recently modified first
pub fn list_log_files(dir: &Path) -> io::Result<Vec<LogFileInfo>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let now = SystemTime::now();
    let mut files: Vec<(SystemTime, LogFileInfo)> = log_files(dir)?
        .into_iter()
        .filter_map(|path| {
            let metadata = fs::metadata(&path).ok().filter(|m| m.is_file())?;
            let modified = metadata.modified().ok()?;
            let age = now.duration_since(modified).unwrap_or_default();

            let info = LogFileInfo {
                name: path.file_name()?.to_string_lossy().into_owned(),
                size: metadata.len(),
                size_human: format_bytes(metadata.len(), 2),
                created: metadata.created().ok().map(DateTime::<Local>::from),
                modified: DateTime::<Local>::from(modified),
                age_days: age.as_secs() / SECONDS_PER_DAY,
                path,
            };
            Some((modified, info))
        })
        .collect();

    files.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(files.into_iter().map(|(_, info)| info).collect())
}

fn log_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let dir = dir.to_str().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "log directory is not valid UTF-8")
    })?;
    let pattern = format!("{}/*.log*", glob::Pattern::escape(dir));

    let paths = glob::glob(&pattern)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
    Ok(paths.filter_map(Result::ok).collect())
}
