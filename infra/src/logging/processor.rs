//! Record processors adding process metadata to every record

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use sysinfo::{Pid, System};
use wd_shared::utils::format_bytes;

use super::record::LogRecord;

/// Mutates a record before it reaches the sinks
pub trait RecordProcessor: Send + Sync {
    fn process(&self, record: &mut LogRecord);
}

/// Adds `process_id`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessIdProcessor;

impl RecordProcessor for ProcessIdProcessor {
    fn process(&self, record: &mut LogRecord) {
        record
            .extra
            .insert("process_id".to_string(), Value::from(std::process::id()));
    }
}

/// Adds `memory_usage` and `memory_peak_usage` in human-readable form
pub struct MemoryUsageProcessor {
    sampler: Arc<MemorySampler>,
}

impl MemoryUsageProcessor {
    pub fn new(sampler: Arc<MemorySampler>) -> Self {
        Self { sampler }
    }
}

impl RecordProcessor for MemoryUsageProcessor {
    fn process(&self, record: &mut LogRecord) {
        let current = self.sampler.current();
        record
            .extra
            .insert("memory_usage".to_string(), Value::String(format_bytes(current, 2)));
        record.extra.insert(
            "memory_peak_usage".to_string(),
            Value::String(format_bytes(self.sampler.peak(), 2)),
        );
    }
}

/// Samples the resident memory of the current process
///
/// The peak is the highest value observed by this sampler, not the OS
/// high-water mark.
pub struct MemorySampler {
    system: Mutex<System>,
    pid: Option<Pid>,
    peak: AtomicU64,
}

impl MemorySampler {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
            pid: sysinfo::get_current_pid().ok(),
            peak: AtomicU64::new(0),
        }
    }

    /// Current resident memory in bytes, 0 when unavailable
    pub fn current(&self) -> u64 {
        let Some(pid) = self.pid else {
            return 0;
        };

        let mut system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        system.refresh_process(pid);
        let bytes = system.process(pid).map(|process| process.memory()).unwrap_or(0);
        self.peak.fetch_max(bytes, Ordering::Relaxed);
        bytes
    }

    pub fn peak(&self) -> u64 {
        self.peak.load(Ordering::Relaxed)
    }
}

impl Default for MemorySampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::level::LogLevel;
    use serde_json::Map;

    #[test]
    fn test_processors_fill_extra() {
        let sampler = Arc::new(MemorySampler::new());
        let mut record = LogRecord::new("test", LogLevel::Info, "hello".to_string(), Map::new());

        ProcessIdProcessor.process(&mut record);
        MemoryUsageProcessor::new(sampler.clone()).process(&mut record);

        assert_eq!(record.extra["process_id"], Value::from(std::process::id()));
        assert!(record.extra["memory_usage"].as_str().unwrap().ends_with('B'));
        assert!(record.extra["memory_peak_usage"].is_string());
    }
}
