//! Shared utilities and common types for the Warden server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and layered loading
//! - Configuration error types
//! - Utility functions (byte formatting)

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, Environment, JwtConfig, LogFormat, LoggingConfig, RotationPolicy,
    ServerConfig,
};
pub use errors::{ConfigError, ConfigResult};
pub use utils::bytes;
