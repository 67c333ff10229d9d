//! Explicit registry of route contributions
//!
//! Each contribution is identified as `<prefix>.<name>`. The registry only
//! keeps contributions whose prefix is in its accepted list, and applies
//! them to the app in registration order.

use std::fmt;
use std::sync::Arc;

use actix_web::web;
use tracing::{debug, warn};

/// A function adding routes to the application
pub type RouteContribution = Arc<dyn Fn(&mut web::ServiceConfig) + Send + Sync>;

pub struct RouteRegistry {
    prefixes: Vec<String>,
    routes: Vec<(String, RouteContribution)>,
}

impl RouteRegistry {
    /// Creates a registry accepting the given extension prefixes
    ///
    /// An empty list accepts every extension.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            routes: Vec::new(),
        }
    }

    /// Whether an extension with this id would be accepted
    pub fn accepts(&self, extension_id: &str) -> bool {
        if self.prefixes.is_empty() {
            return true;
        }

        let prefix = extension_id.split('.').next().unwrap_or_default();
        self.prefixes.iter().any(|accepted| accepted == prefix)
    }

    /// Adds a contribution, returning `false` when it is not accepted
    ///
    /// Ids outside the accepted prefixes and ids already registered are
    /// rejected.
    pub fn register<F>(&mut self, extension_id: impl Into<String>, contribution: F) -> bool
    where
        F: Fn(&mut web::ServiceConfig) + Send + Sync + 'static,
    {
        let extension_id = extension_id.into();

        if !self.accepts(&extension_id) {
            debug!(extension = %extension_id, "route extension filtered out by prefix");
            return false;
        }
        if self.routes.iter().any(|(id, _)| *id == extension_id) {
            warn!(extension = %extension_id, "route extension already registered");
            return false;
        }

        debug!(extension = %extension_id, "registered route extension");
        self.routes.push((extension_id, Arc::new(contribution)));
        true
    }

    /// Applies every accepted contribution in registration order
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        for (_, contribution) in &self.routes {
            contribution(cfg);
        }
    }

    /// Ids of the accepted contributions, in registration order
    pub fn extensions(&self) -> Vec<&str> {
        self.routes.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for RouteRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRegistry")
            .field("prefixes", &self.prefixes)
            .field("extensions", &self.extensions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut web::ServiceConfig) {}

    #[test]
    fn test_prefix_filter_uses_first_segment() {
        let registry = RouteRegistry::new(["core", "billing"]);

        assert!(registry.accepts("core.health"));
        assert!(registry.accepts("billing.invoices.list"));
        assert!(!registry.accepts("corex.health"));
        assert!(!registry.accepts("reports.daily"));
    }

    #[test]
    fn test_empty_prefix_list_accepts_all() {
        let registry = RouteRegistry::new(Vec::<String>::new());
        assert!(registry.accepts("anything.at.all"));
        assert!(registry.accepts("plain"));
    }

    #[test]
    fn test_register_reports_acceptance() {
        let mut registry = RouteRegistry::new(["core"]);

        assert!(registry.register("core.health", noop));
        assert!(!registry.register("vendor.health", noop));
        assert!(!registry.register("core.health", noop));
        assert!(registry.register("core.session", noop));

        assert_eq!(registry.extensions(), vec!["core.health", "core.session"]);
        assert_eq!(registry.len(), 2);
    }
}
