//! Host application contract and the axum-backed host.

use std::{collections::HashMap, fmt, future::Future, sync::Arc};

use axum::{
    Extension, Router,
    body::{Body, Bytes},
    routing::MethodRouter,
};
use frostline_router::{Route, RouteError, RoutePattern, RouteTable, SharedUrlGenerator};
use http::{Method, Request, StatusCode};
use thiserror::Error;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{debug, info};

/// Host dispatch errors.
#[derive(Debug, Error)]
pub enum HostError {
    /// The request could not be built from the URL.
    #[error("invalid request for `{uri}`: {source}")]
    Request {
        uri: String,
        #[source]
        source: http::Error,
    },

    /// The response body could not be collected.
    #[error("failed to read response body: {0}")]
    Body(#[from] axum::Error),

    /// The host could not be booted.
    #[error("{0}")]
    Boot(String),
}

/// A response returned by in-process dispatch.
#[derive(Debug, Clone)]
pub struct HostResponse {
    /// Response status.
    pub status: StatusCode,
    /// Raw response body.
    pub body: Bytes,
}

/// The web application being frozen.
pub trait Host: Send + Sync {
    /// Named routes of the application.
    fn routes(&self) -> Arc<RouteTable>;

    /// Prepare the application for handling requests.
    fn boot(&mut self) -> Result<(), HostError> {
        Ok(())
    }

    /// Flush state buffered by the application before requests are issued.
    fn flush(&mut self) {}

    /// When enabled, a failing handler produces an error response instead of
    /// bringing down the caller.
    fn isolate_failures(&mut self, enabled: bool);

    /// Replace the URL generator handlers use to link to other routes.
    fn install_url_generator(&mut self, generator: SharedUrlGenerator);

    /// Handle a request in-process.
    fn dispatch(
        &self,
        method: Method,
        uri: &str,
    ) -> impl Future<Output = Result<HostResponse, HostError>> + Send;
}

/// A host serving an [`axum::Router`] whose routes are registered by name.
///
/// Handlers reach the active URL generator through
/// `Extension<SharedUrlGenerator>`.
pub struct AxumHost {
    router: Router,
    routes: Arc<RouteTable>,
    unnamed: HashMap<String, String>,
    url_generator: Option<SharedUrlGenerator>,
    isolate_failures: bool,
    booted: bool,
    app: Router,
}

impl AxumHost {
    /// Create a host without routes.
    #[must_use]
    pub fn new() -> Self {
        let mut host = Self {
            router: Router::new(),
            routes: Arc::new(RouteTable::new()),
            unnamed: HashMap::new(),
            url_generator: None,
            isolate_failures: false,
            booted: false,
            app: Router::new(),
        };
        host.rebuild();
        host
    }

    /// Register a named route.
    pub fn route(
        self,
        name: &str,
        pattern: &str,
        handler: MethodRouter,
    ) -> Result<Self, RouteError> {
        self.named(Route::new(name, pattern)?, handler)
    }

    /// Register a named route carrying defaults or requirements.
    ///
    /// Fails instead of panicking when the pattern overlaps a route that is
    /// already registered.
    pub fn named(mut self, route: Route, handler: MethodRouter) -> Result<Self, RouteError> {
        self.check_unnamed_overlap(route.pattern())?;
        let path = route.pattern().as_str().to_string();
        Arc::make_mut(&mut self.routes).add(route)?;
        self.router = self.router.route(&path, handler);
        self.rebuild();
        Ok(self)
    }

    /// Register a route that has no name. It is only frozen when a generator
    /// lists its URL.
    pub fn unnamed(mut self, path: &str, handler: MethodRouter) -> Result<Self, RouteError> {
        let pattern = RoutePattern::parse(path)?;
        self.check_unnamed_overlap(&pattern)?;
        if let Some(existing) = self
            .routes
            .iter()
            .find(|route| route.pattern().shape() == pattern.shape())
        {
            return Err(overlap(&pattern, existing.pattern().as_str()));
        }

        self.unnamed.insert(pattern.shape(), path.to_string());
        self.router = self.router.route(path, handler);
        self.rebuild();
        Ok(self)
    }

    fn check_unnamed_overlap(&self, pattern: &RoutePattern) -> Result<(), RouteError> {
        match self.unnamed.get(&pattern.shape()) {
            Some(existing) => Err(overlap(pattern, existing)),
            None => Ok(()),
        }
    }

    /// The URL generator handlers currently see.
    #[must_use]
    pub fn url_generator(&self) -> SharedUrlGenerator {
        self.url_generator
            .clone()
            .unwrap_or_else(|| Arc::clone(&self.routes) as SharedUrlGenerator)
    }

    /// Whether [`Host::boot`] has run.
    #[must_use]
    pub fn is_booted(&self) -> bool {
        self.booted
    }

    fn rebuild(&mut self) {
        let mut app = self
            .router
            .clone()
            .layer(Extension(self.url_generator()));
        if self.isolate_failures {
            app = app.layer(CatchPanicLayer::new());
        }
        self.app = app;
    }
}

fn overlap(pattern: &RoutePattern, existing: &str) -> RouteError {
    RouteError::OverlappingPattern {
        pattern: pattern.to_string(),
        existing: existing.to_string(),
    }
}

impl Default for AxumHost {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AxumHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxumHost")
            .field("routes", &self.routes.len())
            .field("isolate_failures", &self.isolate_failures)
            .field("booted", &self.booted)
            .finish_non_exhaustive()
    }
}

impl Host for AxumHost {
    fn routes(&self) -> Arc<RouteTable> {
        Arc::clone(&self.routes)
    }

    fn boot(&mut self) -> Result<(), HostError> {
        if !self.booted {
            info!(routes = self.routes.len(), "booting application");
            self.booted = true;
        }
        self.rebuild();
        Ok(())
    }

    fn isolate_failures(&mut self, enabled: bool) {
        self.isolate_failures = enabled;
        self.rebuild();
    }

    fn install_url_generator(&mut self, generator: SharedUrlGenerator) {
        self.url_generator = Some(generator);
        self.rebuild();
    }

    async fn dispatch(&self, method: Method, uri: &str) -> Result<HostResponse, HostError> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .map_err(|source| HostError::Request {
                uri: uri.to_string(),
                source,
            })?;

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {});

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        debug!(uri, status = status.as_u16(), bytes = body.len(), "dispatched request");

        Ok(HostResponse { status, body })
    }
}
