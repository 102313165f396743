//! Registry of active routes
//!
//! Owned by the process entry point and passed by reference to command
//! handlers; routes are keyed by their user-facing port name. A failed
//! or stopped route never affects the other entries.

use crate::router::Router;
use std::collections::HashMap;

/// Active routes for this session
#[derive(Default)]
pub struct RouteRegistry {
    routes: HashMap<String, Router>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route under its port name, replacing any previous entry
    ///
    /// A replaced route is stopped before it is dropped (via Drop).
    pub fn insert(&mut self, router: Router) {
        self.routes.insert(router.port_name().to_string(), router);
    }

    /// Remove and return the route for a port, if registered
    pub fn remove(&mut self, port_name: &str) -> Option<Router> {
        self.routes.remove(port_name)
    }

    pub fn get(&self, port_name: &str) -> Option<&Router> {
        self.routes.get(port_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Router> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Whether any registered route still reports an active relay
    pub fn any_running(&self) -> bool {
        self.routes.values().any(|r| r.is_running())
    }

    /// Stop every registered route, keeping the entries for listing
    pub fn stop_all(&mut self) {
        for router in self.routes.values_mut() {
            router.stop();
        }
    }
}
