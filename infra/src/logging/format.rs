//! Record formatters for the general and error sinks

use serde_json::{Map, Value};

use super::record::LogRecord;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SEPARATOR_WIDTH: usize = 80;

/// Renders a record into the bytes appended to a sink
pub trait RecordFormatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> String;
}

/// One line per record:
/// `[date] channel.LEVEL: message {context} {extra}`
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormatter;

impl RecordFormatter for LineFormatter {
    fn format(&self, record: &LogRecord) -> String {
        format!(
            "[{}] {}.{}: {} {} {}\n",
            record.datetime.format(DATE_FORMAT),
            record.channel,
            record.level,
            single_line(&record.message),
            render(&record.context),
            render(&record.extra),
        )
    }
}

/// Multi-line block with labelled context and extra, closed by a rule
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorBlockFormatter;

impl RecordFormatter for ErrorBlockFormatter {
    fn format(&self, record: &LogRecord) -> String {
        format!(
            "[{}] {}.{}: {}\nContext: {}\nExtra: {}\n{}\n",
            record.datetime.format(DATE_FORMAT),
            record.channel,
            record.level,
            record.message,
            render(&record.context),
            render(&record.extra),
            "-".repeat(SEPARATOR_WIDTH),
        )
    }
}

fn render(map: &Map<String, Value>) -> String {
    // Serializing a map of JSON values cannot fail.
    serde_json::to_string(map).unwrap_or_default()
}

fn single_line(message: &str) -> String {
    message.replace(['\r', '\n'], " ")
}
