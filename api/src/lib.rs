//! HTTP boundary for Warden
//!
//! Exposes the authentication middleware, the route registry and the
//! application factory used by the `warden-api` binary and by tests.

pub mod app;
pub mod middleware;
pub mod routes;

pub use app::{create_app, AppState};
pub use routes::registry::RouteRegistry;
