//! Route name to URL resolution.

use std::sync::Arc;

use frostline_core::Params;
use frostline_router::RouteTable;
use tracing::debug;

/// Resolves route references against the host's route table.
///
/// Resolution failures are not errors for the freezer: the route is skipped.
#[derive(Debug, Clone)]
pub struct UrlResolver {
    routes: Arc<RouteTable>,
}

impl UrlResolver {
    /// Create a resolver over a route table.
    #[must_use]
    pub fn new(routes: Arc<RouteTable>) -> Self {
        Self { routes }
    }

    /// Resolve a route to its URL, or `None` if it cannot be generated.
    #[must_use]
    pub fn resolve(&self, name: &str, params: &Params) -> Option<String> {
        match self.routes.generate(name, params) {
            Ok(url) => Some(url),
            Err(e) => {
                debug!(route = name, error = %e, "route did not resolve");
                None
            }
        }
    }
}
