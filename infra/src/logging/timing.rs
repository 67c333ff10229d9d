//! Execution timing around fallible operations

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::io;
use std::panic::Location;
use std::time::Instant;

use serde_json::{Map, Value};
use thiserror::Error;
use wd_core::DomainError;
use wd_shared::utils::{format_bytes, format_signed_bytes};

use super::error::LogError;
use super::handle::LoggerHandle;
use super::record::into_context;

/// An error that can be described in an operation failure record
pub trait ReportableError: fmt::Display {
    /// Machine-readable code, if the error carries one
    fn code(&self) -> Option<String> {
        None
    }

    /// Where the error was raised, if known
    fn location(&self) -> Option<&'static Location<'static>> {
        None
    }

    /// Stack trace captured when the error was raised
    fn trace(&self) -> Option<String> {
        None
    }
}

impl ReportableError for io::Error {
    fn code(&self) -> Option<String> {
        Some(
            self.raw_os_error()
                .map(|code| code.to_string())
                .unwrap_or_else(|| format!("{:?}", self.kind())),
        )
    }
}

impl ReportableError for anyhow::Error {
    fn code(&self) -> Option<String> {
        if let Some(failure) = self.downcast_ref::<OperationFailure>() {
            return failure.code();
        }
        if let Some(error) = self.downcast_ref::<DomainError>() {
            return error.code();
        }
        if let Some(error) = self.downcast_ref::<LogError>() {
            return error.code();
        }
        self.downcast_ref::<io::Error>().and_then(|error| error.code())
    }

    fn location(&self) -> Option<&'static Location<'static>> {
        self.downcast_ref::<OperationFailure>()
            .map(|failure| failure.location)
    }

    fn trace(&self) -> Option<String> {
        let backtrace = self.backtrace();
        match backtrace.status() {
            BacktraceStatus::Captured => Some(backtrace.to_string()),
            _ => None,
        }
    }
}

impl ReportableError for DomainError {
    fn code(&self) -> Option<String> {
        Some(self.error_code().to_string())
    }
}

impl ReportableError for LogError {
    fn code(&self) -> Option<String> {
        match self {
            LogError::CreateDirectory { source, .. } => source.code(),
            LogError::Io(source) => source.code(),
            LogError::Appender { .. } => Some("log_appender_failed".to_string()),
            LogError::InvalidLevel { .. } => Some("invalid_log_level".to_string()),
        }
    }
}

/// Generic operation error that remembers where it was created
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct OperationFailure {
    pub message: String,
    pub code: Option<String>,
    pub location: &'static Location<'static>,
}

impl OperationFailure {
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            location: Location::caller(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl ReportableError for OperationFailure {
    fn code(&self) -> Option<String> {
        self.code.clone()
    }

    fn location(&self) -> Option<&'static Location<'static>> {
        Some(self.location)
    }
}

/// Runs `operation`, logging its start, duration and memory delta
///
/// The result is returned untouched: a failure is logged at `Error` with its
/// message, code, location and stack trace, then handed back to the caller.
#[track_caller]
pub fn with_timing<T, E, F>(
    logger: &LoggerHandle,
    operation: &str,
    context: Value,
    f: F,
) -> Result<T, E>
where
    E: ReportableError,
    F: FnOnce() -> Result<T, E>,
{
    let call_site = Location::caller();
    let context = into_context(context);

    let memory_before = logger.memory().current();
    let mut start_context = context.clone();
    start_context.insert(
        "memory_before".to_string(),
        Value::String(format_bytes(memory_before, 2)),
    );
    logger.info(format!("Starting operation: {operation}"), Value::Object(start_context));

    let started = Instant::now();
    let result = f();
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    let memory_used = logger.memory().current() as i64 - memory_before as i64;

    let mut finish_context = context;
    finish_context.insert(
        "execution_time_ms".to_string(),
        Value::from((elapsed_ms * 100.0).round() / 100.0),
    );
    finish_context.insert(
        "memory_used".to_string(),
        Value::String(format_signed_bytes(memory_used, 2)),
    );

    match &result {
        Ok(_) => {
            finish_context.insert("success".to_string(), Value::Bool(true));
            logger.info(
                format!("Operation completed: {operation}"),
                Value::Object(finish_context),
            );
        }
        Err(e) => {
            describe_failure(&mut finish_context, e, call_site);
            logger.error(
                format!("Operation failed: {operation}"),
                Value::Object(finish_context),
            );
        }
    }

    result
}

fn describe_failure<E: ReportableError>(
    context: &mut Map<String, Value>,
    error: &E,
    call_site: &'static Location<'static>,
) {
    let location = error.location().unwrap_or(call_site);
    context.insert("error".to_string(), Value::String(error.to_string()));
    context.insert(
        "error_code".to_string(),
        error.code().map(Value::String).unwrap_or(Value::Null),
    );
    context.insert("file".to_string(), Value::String(location.file().to_string()));
    context.insert("line".to_string(), Value::from(location.line()));
    let trace = error
        .trace()
        .unwrap_or_else(|| Backtrace::force_capture().to_string());
    context.insert("trace".to_string(), Value::String(trace));
    context.insert("success".to_string(), Value::Bool(false));
}
