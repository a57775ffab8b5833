//! Per-pass deduplication.
//!
//! A fresh [`FrozenState`] is created for every freeze and threaded through
//! each pipeline stage. Route keys are recorded as soon as they resolve, URLs
//! only once their file has been written.

use std::collections::HashSet;

/// Routes and URLs already handled during the current pass.
#[derive(Debug, Clone, Default)]
pub struct FrozenState {
    routes: HashSet<String>,
    urls: HashSet<String>,
}

impl FrozenState {
    /// Create an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the route was already resolved in this pass.
    #[must_use]
    pub fn should_skip_route(&self, key: &str) -> bool {
        self.routes.contains(key)
    }

    /// Whether the URL was already written in this pass.
    #[must_use]
    pub fn should_skip_url(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Record a resolved route. Returns `false` if it was already recorded.
    pub fn record_route(&mut self, key: impl Into<String>) -> bool {
        self.routes.insert(key.into())
    }

    /// Record a written URL. Returns `false` if it was already recorded.
    pub fn record_url(&mut self, url: impl Into<String>) -> bool {
        self.urls.insert(url.into())
    }

    /// Number of recorded routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }
}
