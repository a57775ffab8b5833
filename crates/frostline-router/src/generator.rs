//! URL generation capability.
//!
//! Host-side code (handlers, templates) turns route names into URLs through a
//! [`UrlGenerator`]. The freezer swaps the host's generator for a
//! [`FreezingUrlGenerator`], which reports every route it generates a URL for
//! so that linked pages are frozen in the same pass.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, PoisonError},
};

use frostline_core::{Params, RouteSpec};
use tracing::trace;

use crate::{error::Result, table::RouteTable};

/// Turns a route name and its parameters into a URL.
pub trait UrlGenerator: Send + Sync {
    /// Generate the URL for a named route.
    fn generate(&self, name: &str, params: &Params) -> Result<String>;

    /// Generate the URL for a named route that takes no parameters.
    fn path(&self, name: &str) -> Result<String> {
        self.generate(name, &Params::new())
    }
}

/// URL generator shared between the host and the freezer.
pub type SharedUrlGenerator = Arc<dyn UrlGenerator>;

impl UrlGenerator for RouteTable {
    fn generate(&self, name: &str, params: &Params) -> Result<String> {
        RouteTable::generate(self, name, params)
    }
}

impl<T: UrlGenerator + ?Sized> UrlGenerator for Arc<T> {
    fn generate(&self, name: &str, params: &Params) -> Result<String> {
        (**self).generate(name, params)
    }
}

/// Routes discovered through URL generation, waiting to be frozen.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryQueue {
    inner: Arc<Mutex<VecDeque<RouteSpec>>>,
}

impl DiscoveryQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a discovered route.
    pub fn push(&self, spec: RouteSpec) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(spec);
    }

    /// Take every queued route, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<RouteSpec> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }

    /// Drop every queued route.
    pub fn clear(&self) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of queued routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decorates a URL generator so every generated route is queued for freezing.
pub struct FreezingUrlGenerator {
    inner: SharedUrlGenerator,
    discoveries: DiscoveryQueue,
}

impl FreezingUrlGenerator {
    /// Wrap `inner`, reporting generated routes to `discoveries`.
    #[must_use]
    pub fn new(inner: SharedUrlGenerator, discoveries: DiscoveryQueue) -> Self {
        Self { inner, discoveries }
    }
}

impl UrlGenerator for FreezingUrlGenerator {
    fn generate(&self, name: &str, params: &Params) -> Result<String> {
        let url = self.inner.generate(name, params)?;
        trace!(route = name, url = %url, "discovered route");
        self.discoveries.push(RouteSpec::Named {
            name: name.to_string(),
            params: params.clone(),
        });
        Ok(url)
    }
}
