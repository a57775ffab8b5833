//! Freeze orchestration.
//!
//! Boots the host, collects routes from every generator in priority order and
//! pushes each one through the pipeline, followed by any routes the pages
//! linked to while they were rendered.

use std::{sync::Arc, time::Instant};

use frostline_core::{FreezerConfig, GeneratorErrorPolicy, Params, RouteDedup, RouteSpec};
use frostline_router::{DiscoveryQueue, FreezingUrlGenerator, SharedUrlGenerator};
use tracing::{debug, info, warn};

use crate::{
    error::{FreezeError, Result},
    host::Host,
    pipeline::Outcome,
    registry::{AppRoutes, DEFAULT_PRIORITY, GeneratorRegistry, RouteGenerator},
    resolver::UrlResolver,
    state::FrozenState,
};

/// Freeze statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreezeStats {
    /// Number of files written.
    pub pages: usize,

    /// Number of routes resolved and recorded.
    pub routes: usize,

    /// Number of linked routes, not otherwise frozen yet, that were handled
    /// because a page generated a URL for them.
    pub discovered: usize,

    /// Number of routes that did not resolve.
    pub skipped: usize,

    /// Number of responses with a status that is not frozen.
    pub rejected: usize,

    /// Number of requests or writes that failed.
    pub failed: usize,

    /// Number of generators whose routes were dropped after an error.
    pub generator_failures: usize,

    /// Freeze duration in milliseconds.
    pub duration_ms: u64,
}

impl FreezeStats {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Frozen(_) => self.pages += 1,
            Outcome::AlreadyFrozen => {}
            Outcome::Unresolved => self.skipped += 1,
            Outcome::Rejected(_) => self.rejected += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

/// Freezes a host application into static files.
pub struct Freezer<H> {
    host: H,
    config: FreezerConfig,
    registry: GeneratorRegistry,
    resolver: UrlResolver,
    discoveries: DiscoveryQueue,
}

impl<H: Host> Freezer<H> {
    /// Create a freezer for `host`.
    ///
    /// Registers the default generator, which yields every route of the host
    /// not listed in `excluded_routes`, and installs the freezing URL
    /// generator when `override_url_generator` is set.
    pub fn new(mut host: H, config: FreezerConfig) -> Self {
        let routes = host.routes();
        let discoveries = DiscoveryQueue::new();

        if config.override_url_generator {
            let inner: SharedUrlGenerator = routes.clone();
            host.install_url_generator(Arc::new(FreezingUrlGenerator::new(
                inner,
                discoveries.clone(),
            )));
        }

        let mut registry = GeneratorRegistry::new();
        registry.register(
            AppRoutes::new(routes.clone(), config.excluded_routes.clone()),
            DEFAULT_PRIORITY,
        );

        Self {
            host,
            config,
            registry,
            resolver: UrlResolver::new(routes),
            discoveries,
        }
    }

    /// Register a generator. See [`GeneratorRegistry::register`].
    pub fn register_generator<G>(&mut self, generator: G, priority: i64) -> &mut Self
    where
        G: RouteGenerator + 'static,
    {
        self.registry.register(generator, priority);
        self
    }

    /// Freeze every route produced by the registered generators.
    ///
    /// Individual routes and URLs that fail are logged and counted. Only a
    /// destination root that cannot be created, a host that fails to boot or
    /// a failing generator under the abort policy end the pass with an error.
    pub async fn freeze(&mut self) -> Result<FreezeStats> {
        let start = Instant::now();
        let mut state = FrozenState::new();
        let mut stats = FreezeStats::default();

        info!(
            destination = %self.config.destination.display(),
            generators = self.registry.len(),
            "starting freeze"
        );

        self.host.boot()?;
        self.host.flush();
        self.host.isolate_failures(true);
        self.discoveries.clear();

        let destination = &self.config.destination;
        tokio::fs::create_dir_all(destination)
            .await
            .map_err(|source| FreezeError::Destination {
                path: destination.clone(),
                source,
            })?;

        let specs = self.collect(&mut stats)?;
        debug!(count = specs.len(), "collected routes");

        for spec in specs {
            let outcome = self.freeze_item(&spec, &mut state).await;
            stats.record(&outcome);

            for outcome in self.freeze_discovered(&mut state).await {
                if outcome != Outcome::AlreadyFrozen {
                    stats.discovered += 1;
                }
                stats.record(&outcome);
            }
        }

        stats.routes = state.route_count();
        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            pages = stats.pages,
            routes = stats.routes,
            discovered = stats.discovered,
            skipped = stats.skipped,
            rejected = stats.rejected,
            failed = stats.failed,
            duration_ms = stats.duration_ms,
            "freeze complete"
        );

        Ok(stats)
    }

    /// Run every generator in priority order and concatenate their routes.
    fn collect(&self, stats: &mut FreezeStats) -> Result<Vec<RouteSpec>> {
        let mut specs = Vec::new();

        for (priority, generator) in self.registry.iter() {
            match generator.generate() {
                Ok(routes) => {
                    debug!(priority, count = routes.len(), "generator produced routes");
                    specs.extend(routes);
                }
                Err(source) => match self.config.on_generator_error {
                    GeneratorErrorPolicy::Skip => {
                        warn!(
                            priority,
                            error = %source,
                            "generator failed, skipping its routes"
                        );
                        stats.generator_failures += 1;
                    }
                    GeneratorErrorPolicy::Abort => {
                        return Err(FreezeError::Generator { priority, source });
                    }
                },
            }
        }

        Ok(specs)
    }

    /// Identity under which a route is recorded in [`FrozenState`].
    pub(crate) fn route_key(&self, name: &str, params: &Params) -> String {
        match self.config.dedupe_routes_by {
            RouteDedup::Name => name.to_string(),
            RouteDedup::Reference => RouteSpec::Named {
                name: name.to_string(),
                params: params.clone(),
            }
            .to_string(),
        }
    }

    pub(crate) fn resolver(&self) -> &UrlResolver {
        &self.resolver
    }

    pub(crate) fn discoveries(&self) -> &DiscoveryQueue {
        &self.discoveries
    }

    /// The host application.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The freezer configuration.
    #[must_use]
    pub fn config(&self) -> &FreezerConfig {
        &self.config
    }

    /// The registered generators.
    #[must_use]
    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }
}

impl<H: std::fmt::Debug> std::fmt::Debug for Freezer<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Freezer")
            .field("host", &self.host)
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
