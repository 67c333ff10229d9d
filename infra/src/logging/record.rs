//! Log record and context helpers

use chrono::{DateTime, Local};
use serde_json::{Map, Value};

use super::level::LogLevel;

/// A single entry passed through processors and sinks
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub datetime: DateTime<Local>,
    /// Name of the logger that produced the record
    pub channel: String,
    pub level: LogLevel,
    pub message: String,
    /// Caller-supplied structured data
    pub context: Map<String, Value>,
    /// Data added by processors
    pub extra: Map<String, Value>,
}

impl LogRecord {
    pub fn new(channel: &str, level: LogLevel, message: String, context: Map<String, Value>) -> Self {
        Self {
            datetime: Local::now(),
            channel: channel.to_string(),
            level,
            message,
            context,
            extra: Map::new(),
        }
    }
}

/// Normalizes a JSON value into a context map
///
/// Objects are used as-is, `null` becomes an empty map and any other value
/// is stored under `value`.
pub fn into_context(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

/// Base context describing the running process, merged with `extra`
pub fn create_context(extra: Value) -> Map<String, Value> {
    let mut context = Map::new();
    context.insert(
        "timestamp".to_string(),
        Value::String(Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
    );
    context.insert(
        "crate_version".to_string(),
        Value::String(env!("CARGO_PKG_VERSION").to_string()),
    );
    context.insert("pid".to_string(), Value::from(std::process::id()));
    context.insert("os".to_string(), Value::String(std::env::consts::OS.to_string()));
    context.extend(into_context(extra));
    context
}
