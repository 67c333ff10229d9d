//! Named logger writing to a general and an error sink

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::level::LogLevel;
use super::processor::{MemorySampler, RecordProcessor};
use super::record::{into_context, LogRecord};
use super::sink::RotatingSink;

const FORWARD_TARGET: &str = "wd_infra::logging";

/// A cached, shareable logger
///
/// Every record passes through the processors and is then offered to both
/// sinks. The general sink keeps records at or above the logger level, the
/// error sink keeps `Error` and above.
pub struct LoggerHandle {
    name: String,
    directory: PathBuf,
    retention_days: u32,
    max_files: usize,
    level: LogLevel,
    general: RotatingSink,
    errors: RotatingSink,
    processors: Vec<Box<dyn RecordProcessor>>,
    memory: Arc<MemorySampler>,
}

impl LoggerHandle {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: String,
        directory: PathBuf,
        retention_days: u32,
        max_files: usize,
        level: LogLevel,
        general: RotatingSink,
        errors: RotatingSink,
        processors: Vec<Box<dyn RecordProcessor>>,
        memory: Arc<MemorySampler>,
    ) -> Self {
        Self {
            name,
            directory,
            retention_days,
            max_files,
            level,
            general,
            errors,
            processors,
            memory,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn retention_days(&self) -> u32 {
        self.retention_days
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// File currently receiving general records
    pub fn general_path(&self) -> PathBuf {
        self.general.current_path()
    }

    /// File currently receiving error records
    pub fn error_path(&self) -> PathBuf {
        self.errors.current_path()
    }

    pub(crate) fn memory(&self) -> &MemorySampler {
        &self.memory
    }

    /// Writes a record to every sink accepting `level`
    ///
    /// `context` should be a JSON object; other values are wrapped. Write
    /// failures are reported through `tracing` and never reach the caller.
    pub fn log(&self, level: LogLevel, message: impl Into<String>, context: Value) {
        let message = message.into();
        if !self.general.accepts(level) && !self.errors.accepts(level) {
            return;
        }

        let mut record = LogRecord::new(&self.name, level, message, into_context(context));
        for processor in &self.processors {
            processor.process(&mut record);
        }

        for sink in [&self.general, &self.errors] {
            if let Err(e) = sink.write(&record) {
                warn!(
                    logger = %self.name,
                    path = %sink.current_path().display(),
                    error = %e,
                    "failed to write log record"
                );
            }
        }

        self.forward(&record);
    }

    pub fn debug(&self, message: impl Into<String>, context: Value) {
        self.log(LogLevel::Debug, message, context);
    }

    pub fn info(&self, message: impl Into<String>, context: Value) {
        self.log(LogLevel::Info, message, context);
    }

    pub fn notice(&self, message: impl Into<String>, context: Value) {
        self.log(LogLevel::Notice, message, context);
    }

    pub fn warning(&self, message: impl Into<String>, context: Value) {
        self.log(LogLevel::Warning, message, context);
    }

    pub fn error(&self, message: impl Into<String>, context: Value) {
        self.log(LogLevel::Error, message, context);
    }

    pub fn critical(&self, message: impl Into<String>, context: Value) {
        self.log(LogLevel::Critical, message, context);
    }

    /// Mirrors the record into the process-wide `tracing` subscriber
    fn forward(&self, record: &LogRecord) {
        let level = record.level.as_tracing();
        let logger = self.name.as_str();
        let message = record.message.as_str();

        if level == tracing::Level::ERROR {
            error!(target: FORWARD_TARGET, logger = %logger, severity = %record.level, "{}", message);
        } else if level == tracing::Level::WARN {
            warn!(target: FORWARD_TARGET, logger = %logger, severity = %record.level, "{}", message);
        } else if level == tracing::Level::INFO {
            info!(target: FORWARD_TARGET, logger = %logger, severity = %record.level, "{}", message);
        } else {
            debug!(target: FORWARD_TARGET, logger = %logger, severity = %record.level, "{}", message);
        }
    }
}

impl std::fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerHandle")
            .field("name", &self.name)
            .field("directory", &self.directory)
            .field("retention_days", &self.retention_days)
            .field("max_files", &self.max_files)
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}
