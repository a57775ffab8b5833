//! Prioritized route generators.
//!
//! Generators are run lowest priority first. Registering at a priority that is
//! already taken moves the new generator to one past the highest priority in
//! use, so no generator is ever dropped.

use std::{collections::BTreeSet, fmt, sync::Arc};

use frostline_core::RouteSpec;
use frostline_router::RouteTable;

/// Priority used for the default generator and when none is given.
pub const DEFAULT_PRIORITY: i64 = 100;

/// Error returned by a failing generator.
pub type GeneratorError = Box<dyn std::error::Error + Send + Sync>;

/// Produces the routes and URLs to freeze.
pub trait RouteGenerator: Send + Sync {
    /// Produce route references, in the order they should be frozen.
    fn generate(&self) -> Result<Vec<RouteSpec>, GeneratorError>;
}

/// Return values accepted from generator closures.
pub trait IntoRoutes {
    /// Convert into the generator result.
    fn into_routes(self) -> Result<Vec<RouteSpec>, GeneratorError>;
}

impl IntoRoutes for Vec<RouteSpec> {
    fn into_routes(self) -> Result<Vec<RouteSpec>, GeneratorError> {
        Ok(self)
    }
}

impl<E> IntoRoutes for Result<Vec<RouteSpec>, E>
where
    E: Into<GeneratorError>,
{
    fn into_routes(self) -> Result<Vec<RouteSpec>, GeneratorError> {
        self.map_err(Into::into)
    }
}

impl<F, R> RouteGenerator for F
where
    F: Fn() -> R + Send + Sync,
    R: IntoRoutes,
{
    fn generate(&self) -> Result<Vec<RouteSpec>, GeneratorError> {
        self().into_routes()
    }
}

/// The default generator: every route of the host that is not excluded.
#[derive(Debug, Clone)]
pub struct AppRoutes {
    routes: Arc<RouteTable>,
    excluded: BTreeSet<String>,
}

impl AppRoutes {
    /// Create the generator over a host route table.
    #[must_use]
    pub fn new(routes: Arc<RouteTable>, excluded: BTreeSet<String>) -> Self {
        Self { routes, excluded }
    }
}

impl RouteGenerator for AppRoutes {
    fn generate(&self) -> Result<Vec<RouteSpec>, GeneratorError> {
        Ok(self
            .routes
            .names()
            .filter(|name| !self.excluded.contains(*name))
            .map(RouteSpec::named)
            .collect())
    }
}

/// Generators ordered by ascending priority. Priorities are unique.
#[derive(Default)]
pub struct GeneratorRegistry {
    generators: Vec<(u64, Box<dyn RouteGenerator>)>,
}

impl GeneratorRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a generator.
    ///
    /// Negative priorities are taken as their absolute value. Returns the
    /// registry for chaining.
    pub fn register<G>(&mut self, generator: G, priority: i64) -> &mut Self
    where
        G: RouteGenerator + 'static,
    {
        let mut priority = priority.unsigned_abs();
        if self.generators.iter().any(|(p, _)| *p == priority) {
            // Sorted, so the last entry holds the maximum.
            priority = self.generators.last().map_or(0, |(p, _)| p + 1);
        }

        let pos = self.generators.partition_point(|(p, _)| *p < priority);
        self.generators.insert(pos, (priority, Box::new(generator)));
        self
    }

    /// Priorities in run order.
    #[must_use]
    pub fn priorities(&self) -> Vec<u64> {
        self.generators.iter().map(|(p, _)| *p).collect()
    }

    /// Generators with their priorities, in run order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &dyn RouteGenerator)> {
        self.generators.iter().map(|(p, g)| (*p, g.as_ref()))
    }

    /// Number of registered generators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Whether no generator is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("priorities", &self.priorities())
            .finish()
    }
}
