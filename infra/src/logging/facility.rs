//! Cached logger construction

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};
use wd_shared::{LoggingConfig, RotationPolicy};

use super::error::{LogError, LogResult};
use super::files::prune_older_than;
use super::format::{ErrorBlockFormatter, LineFormatter};
use super::handle::LoggerHandle;
use super::level::LogLevel;
use super::processor::{MemorySampler, MemoryUsageProcessor, ProcessIdProcessor, RecordProcessor};
use super::sink::RotatingSink;

pub const DEFAULT_RETENTION_DAYS: u32 = 10;
pub const DEFAULT_MAX_FILES: usize = 10;

/// Settings shared by every logger of a facility
#[derive(Debug, Clone)]
pub struct LogFacilityConfig {
    pub root: PathBuf,
    pub rotation: RotationPolicy,
    pub default_retention_days: u32,
    pub default_max_files: usize,
    pub default_level: LogLevel,
}

impl Default for LogFacilityConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("logs"),
            rotation: RotationPolicy::default(),
            default_retention_days: DEFAULT_RETENTION_DAYS,
            default_max_files: DEFAULT_MAX_FILES,
            default_level: LogLevel::Info,
        }
    }
}

impl LogFacilityConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    pub fn from_logging(config: &LoggingConfig) -> LogResult<Self> {
        Ok(Self {
            root: config.root.clone(),
            rotation: config.rotation,
            default_retention_days: config.default_retention_days,
            default_max_files: config.default_max_files,
            default_level: config.default_level.parse()?,
        })
    }

    pub fn with_rotation(mut self, rotation: RotationPolicy) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Requested logger identity and behaviour
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoggerSpec {
    pub name: String,
    /// Output directory, `<root>/<name>` with `-` replaced by `_` when unset
    pub directory: Option<PathBuf>,
    pub retention_days: u32,
    pub max_files: usize,
    pub level: LogLevel,
}

impl LoggerSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            directory: None,
            retention_days: DEFAULT_RETENTION_DAYS,
            max_files: DEFAULT_MAX_FILES,
            level: LogLevel::Info,
        }
    }

    pub fn in_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn retention_days(mut self, days: u32) -> Self {
        self.retention_days = days;
        self
    }

    pub fn max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }
}

/// Cache key: the spec with its directory resolved
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LoggerKey {
    name: String,
    directory: PathBuf,
    retention_days: u32,
    max_files: usize,
    level: LogLevel,
}

/// Owner of the logger cache
///
/// Handles are built once per distinct [`LoggerSpec`] and shared through
/// `Arc`. Construction happens under the cache lock, so concurrent requests
/// for the same spec observe a single construction.
pub struct LogFacility {
    config: LogFacilityConfig,
    memory: Arc<MemorySampler>,
    loggers: Mutex<HashMap<LoggerKey, Arc<LoggerHandle>>>,
}

impl LogFacility {
    pub fn new(config: LogFacilityConfig) -> Self {
        Self {
            config,
            memory: Arc::new(MemorySampler::new()),
            loggers: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &LogFacilityConfig {
        &self.config
    }

    pub fn root(&self) -> &std::path::Path {
        &self.config.root
    }

    /// Spec for `name` using this facility's defaults
    pub fn spec(&self, name: impl Into<String>) -> LoggerSpec {
        LoggerSpec::new(name)
            .retention_days(self.config.default_retention_days)
            .max_files(self.config.default_max_files)
            .level(self.config.default_level)
    }

    /// Logger named `name` with the facility defaults
    pub fn logger(&self, name: &str) -> LogResult<Arc<LoggerHandle>> {
        self.get_logger(self.spec(name))
    }

    /// Returns the cached handle for `spec`, building it on first use
    ///
    /// # Errors
    ///
    /// * `LogError::CreateDirectory` - The output directory could not be created
    /// * `LogError::Appender` - A rotating sink could not be opened
    pub fn get_logger(&self, spec: LoggerSpec) -> LogResult<Arc<LoggerHandle>> {
        let key = self.resolve(spec);

        let mut loggers = self.loggers.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = loggers.get(&key) {
            return Ok(Arc::clone(handle));
        }

        let handle = Arc::new(self.build(&key)?);
        loggers.insert(key, Arc::clone(&handle));
        Ok(handle)
    }

    /// Cron scheduler logger
    pub fn scheduler(&self) -> LogResult<Arc<LoggerHandle>> {
        self.get_logger(
            LoggerSpec::new("scheduler")
                .in_directory(self.config.root.join("cron"))
                .retention_days(10)
                .max_files(10),
        )
    }

    /// Logger for a named background task
    pub fn task(&self, task_name: &str) -> LogResult<Arc<LoggerHandle>> {
        self.get_logger(
            LoggerSpec::new(format!("task-{task_name}"))
                .in_directory(self.config.root.join("tasks"))
                .retention_days(10)
                .max_files(10),
        )
    }

    /// Request logger for the HTTP API
    pub fn api(&self) -> LogResult<Arc<LoggerHandle>> {
        self.get_logger(
            LoggerSpec::new("api-requests")
                .in_directory(self.config.root.join("api"))
                .retention_days(30)
                .max_files(15)
                .level(LogLevel::Debug),
        )
    }

    /// Logger for a third-party integration
    pub fn integration(&self, integration: &str) -> LogResult<Arc<LoggerHandle>> {
        self.get_logger(
            LoggerSpec::new(format!("integration-{integration}"))
                .in_directory(self.config.root.join("integrations"))
                .retention_days(15)
                .max_files(10),
        )
    }

    /// Application-wide warning and error logger
    pub fn errors(&self) -> LogResult<Arc<LoggerHandle>> {
        self.get_logger(
            LoggerSpec::new("errors")
                .in_directory(self.config.root.join("errors"))
                .retention_days(30)
                .max_files(20)
                .level(LogLevel::Warning),
        )
    }

    /// Drops every cached handle
    ///
    /// Handles still held elsewhere keep working; the next request for a
    /// spec builds a new one.
    pub fn clear_cache(&self) {
        let mut loggers = self.loggers.lock().unwrap_or_else(PoisonError::into_inner);
        let dropped = loggers.len();
        loggers.clear();
        debug!(dropped, "cleared logger cache");
    }

    pub fn cached_loggers(&self) -> usize {
        self.loggers.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Applies each cached logger's retention to its directory
    pub fn prune_cached(&self) -> LogResult<usize> {
        let targets: Vec<(PathBuf, u32)> = {
            let loggers = self.loggers.lock().unwrap_or_else(PoisonError::into_inner);
            let mut targets: Vec<(PathBuf, u32)> = loggers
                .keys()
                .map(|key| (key.directory.clone(), key.retention_days))
                .collect();
            targets.sort();
            targets.dedup();
            targets
        };

        let mut removed = 0;
        for (directory, retention_days) in targets {
            removed += prune_older_than(&directory, retention_days)?;
        }
        Ok(removed)
    }

    fn resolve(&self, spec: LoggerSpec) -> LoggerKey {
        let directory = spec
            .directory
            .unwrap_or_else(|| self.config.root.join(spec.name.replace('-', "_")));

        LoggerKey {
            name: spec.name,
            directory,
            retention_days: spec.retention_days,
            max_files: spec.max_files.max(1),
            level: spec.level,
        }
    }

    fn build(&self, key: &LoggerKey) -> LogResult<LoggerHandle> {
        fs::create_dir_all(&key.directory).map_err(|source| LogError::CreateDirectory {
            path: key.directory.clone(),
            source,
        })?;

        let general = RotatingSink::open(
            &key.directory,
            &key.name,
            self.config.rotation,
            key.max_files,
            key.level,
            Box::new(LineFormatter),
        )?;
        let errors = RotatingSink::open(
            &key.directory,
            &format!("{}-errors", key.name),
            self.config.rotation,
            key.max_files,
            LogLevel::Error,
            Box::new(ErrorBlockFormatter),
        )?;

        let processors: Vec<Box<dyn RecordProcessor>> = vec![
            Box::new(ProcessIdProcessor),
            Box::new(MemoryUsageProcessor::new(Arc::clone(&self.memory))),
        ];

        info!(
            logger = %key.name,
            directory = %key.directory.display(),
            level = %key.level,
            "created logger"
        );

        Ok(LoggerHandle::new(
            key.name.clone(),
            key.directory.clone(),
            key.retention_days,
            key.max_files,
            key.level,
            general,
            errors,
            processors,
            Arc::clone(&self.memory),
        ))
    }
}

impl std::fmt::Debug for LogFacility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogFacility")
            .field("config", &self.config)
            .field("cached_loggers", &self.cached_loggers())
            .finish()
    }
}
