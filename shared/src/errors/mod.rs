//! Shared error types

use thiserror::Error;

/// Failure to assemble the application configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
