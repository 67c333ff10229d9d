//! Environment configuration module

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Application environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging/test environment
    Staging,
    /// Production environment
    Production,
}

impl Environment {
    /// Get environment from ENV variable
    pub fn from_env() -> Self {
        env::var("ENVIRONMENT")
            .or_else(|_| env::var("ENV"))
            .or_else(|_| env::var("RUST_ENV"))
            .unwrap_or_else(|_| String::from("development"))
            .parse()
            .unwrap_or(Environment::Development)
    }

    /// Get the configuration file name for this environment
    pub fn config_file(&self) -> &str {
        match self {
            Environment::Development => "config.development.toml",
            Environment::Staging => "config.staging.toml",
            Environment::Production => "config.production.toml",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

/// Logging configuration
///
/// `level` and `format` drive the process-wide `tracing` subscriber, the
/// remaining fields configure the rotating file loggers.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Diagnostic log level (trace, debug, info, warn, error)
    pub level: String,

    /// Diagnostic log format (json, pretty, compact)
    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// Root directory for file loggers
    #[serde(default = "default_log_root")]
    pub root: PathBuf,

    /// Rotation period of file loggers
    #[serde(default)]
    pub rotation: RotationPolicy,

    /// Retention in days for loggers created without explicit settings
    #[serde(default = "default_retention_days")]
    pub default_retention_days: u32,

    /// Number of rotated files kept per sink
    #[serde(default = "default_max_files")]
    pub default_max_files: usize,

    /// Minimum record level written by the general sink
    #[serde(default = "default_file_level")]
    pub default_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: default_log_format(),
            root: default_log_root(),
            rotation: RotationPolicy::default(),
            default_retention_days: default_retention_days(),
            default_max_files: default_max_files(),
            default_level: default_file_level(),
        }
    }
}

impl LoggingConfig {
    /// Create logging config for environment
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                level: String::from("debug"),
                format: LogFormat::Pretty,
                ..Default::default()
            },
            Environment::Staging => Self {
                level: String::from("info"),
                format: LogFormat::Json,
                ..Default::default()
            },
            Environment::Production => Self {
                level: String::from("warn"),
                format: LogFormat::Json,
                ..Default::default()
            },
        }
    }
}

/// Log format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

/// How often file loggers start a new file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    /// Single file per sink, never rotated
    Never,
    Minutely,
    Hourly,
    #[default]
    Daily,
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_log_root() -> PathBuf {
    PathBuf::from("logs")
}

fn default_retention_days() -> u32 {
    10
}

fn default_max_files() -> usize {
    10
}

fn default_file_level() -> String {
    String::from("info")
}
