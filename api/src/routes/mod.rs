//! Route contributions and the registry applying them

pub mod health;
pub mod registry;
pub mod session;

pub use registry::{RouteContribution, RouteRegistry};

pub const HEALTH_EXTENSION: &str = "core.health";
pub const SESSION_EXTENSION: &str = "core.session";

/// Registers the routes shipped with the server
pub fn register_builtin(registry: &mut RouteRegistry) {
    registry.register(HEALTH_EXTENSION, health::configure);
    registry.register(SESSION_EXTENSION, session::configure);
}
