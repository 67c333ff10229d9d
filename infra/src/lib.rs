//! # Infrastructure Layer
//!
//! Concrete infrastructure for Warden:
//! - **Logging**: named, cached file loggers with a general and an error
//!   rotating sink, record enrichment, execution timing and log directory
//!   maintenance.

pub mod logging;

pub use logging::{
    create_context, list_log_files, prune_older_than, with_timing, LogError, LogFacility,
    LogFacilityConfig, LogFileInfo, LogLevel, LoggerHandle, LoggerSpec, OperationFailure,
    ReportableError,
};
