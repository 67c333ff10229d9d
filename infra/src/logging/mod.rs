//! File logging facility
//!
//! - `facility` - Logger cache and presets
//! - `handle` - Named logger with general and error sinks
//! - `sink` - Rotating file output
//! - `format` - Line and error-block formatters
//! - `processor` - Record enrichment
//! - `timing` - Operation timing helper
//! - `files` - Retention and listing of log files

pub mod error;
pub mod facility;
pub mod files;
pub mod format;
pub mod handle;
pub mod level;
pub mod processor;
pub mod record;
pub mod sink;
pub mod timing;

#[cfg(test)]
mod tests;

pub use error::{LogError, LogResult};
pub use facility::{
    LogFacility, LogFacilityConfig, LoggerSpec, DEFAULT_MAX_FILES, DEFAULT_RETENTION_DAYS,
};
pub use files::{list_log_files, prune_older_than, LogFileInfo};
pub use handle::LoggerHandle;
pub use level::LogLevel;
pub use record::{create_context, LogRecord};
pub use timing::{with_timing, OperationFailure, ReportableError};
