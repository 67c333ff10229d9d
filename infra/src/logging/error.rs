//! Errors raised while building loggers

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogError {
    /// The logger's output directory could not be created
    #[error("Failed to create log directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open rotating log file in {}: {message}", path.display())]
    Appender { path: PathBuf, message: String },

    #[error("Unknown log level: {value}")]
    InvalidLevel { value: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type LogResult<T> = Result<T, LogError>;
