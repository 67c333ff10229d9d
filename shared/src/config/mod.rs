//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Token signing and validation configuration
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server configuration

pub mod auth;
pub mod environment;
pub mod server;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

// Re-export commonly used types
pub use auth::{AuthConfig, JwtConfig};
pub use environment::{Environment, LogFormat, LoggingConfig, RotationPolicy};
pub use server::ServerConfig;

/// Prefix of environment variables overriding file configuration
pub const ENV_PREFIX: &str = "WARDEN";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Free-form `section -> key -> value` settings consulted at runtime
    #[serde(default)]
    pub settings: HashMap<String, HashMap<String, String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Defaults for the given environment
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::for_environment(environment),
            settings: HashMap::new(),
        }
    }

    /// Load configuration from all sources
    ///
    /// Later sources win: built-in defaults, `config.toml`, the
    /// environment-specific file, then `WARDEN__*` variables. The plain
    /// `JWT_*` and `SERVER_*` variables are applied last and are the only
    /// place those variables are read.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration, resolving config files relative to `dir`
    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let defaults = Self::for_environment(environment);

        let builder = config::Config::builder()
            .add_source(config::Config::try_from(&defaults)?)
            .add_source(config::File::from(dir.join("config.toml")).required(false))
            .add_source(config::File::from(dir.join(environment.config_file())).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            );

        let mut loaded: AppConfig = builder.build()?.try_deserialize()?;
        loaded.apply_env_overrides();
        Ok(loaded)
    }

    fn apply_env_overrides(&mut self) {
        self.server = self.server.clone().with_env_overrides();
        self.apply_auth_overrides(|key| std::env::var(key).ok());
    }

    /// Applies the plain `JWT_*` variables resolved through `lookup`
    fn apply_auth_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let jwt = &mut self.auth.jwt;
        if let Some(secret) = lookup("JWT_SECRET") {
            jwt.secret = secret;
        }
        if let Some(algorithm) = lookup("JWT_ALGORITHM") {
            jwt.algorithm = algorithm;
        }
        if let Some(lifetime) = lookup("JWT_TOKEN_LIFETIME").and_then(|value| value.parse().ok()) {
            jwt.token_lifetime = lifetime;
        }
        if let Some(host) = lookup("JWT_HOST") {
            jwt.host = host;
        }
    }
}
