//! Fetch-and-write of single routes and URLs.
//!
//! Routes a page links to while it is rendered are frozen right after it.
//! Nothing in here fails the pass: every problem is logged and reported as an
//! [`Outcome`].

use std::{
    collections::VecDeque,
    path::{Component, Path, PathBuf},
};

use frostline_core::{Params, RouteSpec, url_to_path};
use http::Method;
use tracing::{debug, info, warn};

use crate::{freezer::Freezer, host::Host, state::FrozenState};

/// Result of freezing a single route or URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The response was written to this file.
    Frozen(PathBuf),
    /// The route or URL was already handled in this pass.
    AlreadyFrozen,
    /// The route could not be resolved to a URL.
    Unresolved,
    /// The response status is not accepted.
    Rejected(u16),
    /// The request or the write failed.
    Failed,
}

impl<H: Host> Freezer<H> {
    /// Freeze a named route, then every route its page linked to.
    ///
    /// The route is recorded as soon as it resolves, before its URL is
    /// fetched, so a failing fetch is not retried for the same route.
    pub async fn freeze_route(
        &self,
        name: &str,
        params: &Params,
        state: &mut FrozenState,
    ) -> Outcome {
        let outcome = self.freeze_named(name, params, state).await;
        self.freeze_discovered(state).await;
        outcome
    }

    /// Freeze a URL, then every route its page linked to.
    ///
    /// The URL is recorded only once its file has been written, so a rejected
    /// or failed URL may be attempted again later in the same pass.
    pub async fn freeze_url(&self, url: &str, state: &mut FrozenState) -> Outcome {
        let outcome = self.fetch_and_write(url, state).await;
        self.freeze_discovered(state).await;
        outcome
    }

    /// Freeze a generator item, then every route its page linked to.
    pub async fn freeze_spec(&self, spec: &RouteSpec, state: &mut FrozenState) -> Outcome {
        let outcome = self.freeze_item(spec, state).await;
        self.freeze_discovered(state).await;
        outcome
    }

    /// Freeze a single item without following the routes it links to.
    pub(crate) async fn freeze_item(&self, spec: &RouteSpec, state: &mut FrozenState) -> Outcome {
        match spec {
            RouteSpec::Named { name, params } => self.freeze_named(name, params, state).await,
            RouteSpec::Literal { url } => self.fetch_and_write(url, state).await,
        }
    }

    /// Freeze the routes queued by the URL generator, including the ones
    /// queued while rendering them, oldest first.
    pub(crate) async fn freeze_discovered(&self, state: &mut FrozenState) -> Vec<Outcome> {
        let mut pending = VecDeque::from(self.discoveries().drain());
        let mut outcomes = Vec::with_capacity(pending.len());

        while let Some(spec) = pending.pop_front() {
            outcomes.push(self.freeze_item(&spec, state).await);
            pending.extend(self.discoveries().drain());
        }

        outcomes
    }

    async fn freeze_named(&self, name: &str, params: &Params, state: &mut FrozenState) -> Outcome {
        let key = self.route_key(name, params);
        if state.should_skip_route(&key) {
            debug!(route = name, "route already frozen");
            return Outcome::AlreadyFrozen;
        }

        let Some(url) = self.resolver().resolve(name, params) else {
            return Outcome::Unresolved;
        };

        state.record_route(key);
        self.fetch_and_write(&url, state).await
    }

    async fn fetch_and_write(&self, url: &str, state: &mut FrozenState) -> Outcome {
        if state.should_skip_url(url) {
            debug!(url, "url already frozen");
            return Outcome::AlreadyFrozen;
        }

        let response = match self.host().dispatch(Method::GET, &request_uri(url)).await {
            Ok(response) => response,
            Err(e) => {
                warn!(url, error = %e, "request failed");
                return Outcome::Failed;
            }
        };

        let status = response.status.as_u16();
        if !self.config().accept_status.accepts(status) {
            debug!(url, status, "response not frozen");
            return Outcome::Rejected(status);
        }

        let relative = url_to_path(url);
        let Some(destination) = output_path(&self.config().destination, &relative) else {
            warn!(url, path = %relative, "refusing to write outside the destination");
            return Outcome::Failed;
        };

        if let Err(e) = write_file(&destination, &response.body).await {
            warn!(url, path = %destination.display(), error = %e, "failed to write file");
            return Outcome::Failed;
        }

        state.record_url(url);
        info!(url, path = %destination.display(), "froze url");
        Outcome::Frozen(destination)
    }
}

/// Requests always target a path, even when the URL lacks its leading slash.
fn request_uri(url: &str) -> String {
    if url.starts_with('/') || url.contains("://") {
        url.to_string()
    } else {
        format!("/{url}")
    }
}

/// Join the mapped path onto the destination, rejecting parent segments.
fn output_path(destination: &Path, relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }
    Some(destination.join(relative))
}

async fn write_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await
}
