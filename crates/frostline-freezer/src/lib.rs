//! Frostline Freezer Library
//!
//! Turns a dynamic axum application into a static mirror: routes are
//! enumerated by prioritized generators, requested in-process, and every
//! successful response is written below the destination directory.
//!
//! # Modules
//!
//! - [`registry`] - Prioritized route generators
//! - [`resolver`] - Route name to URL resolution
//! - [`state`] - Per-pass deduplication of routes and URLs
//! - [`host`] - Host application contract and the axum-backed host
//! - [`pipeline`] - Fetch-and-write of single routes and URLs
//! - [`freezer`] - Freeze orchestration
//!
//! # Example
//!
//! ```no_run
//! use axum::routing::get;
//! use frostline_core::{FreezerConfig, RouteSpec};
//! use frostline_freezer::{AxumHost, Freezer};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let host = AxumHost::new()
//!     .route("home", "/", get(|| async { "home" }))?
//!     .route("hello", "/hello", get(|| async { "hello" }))?;
//!
//! let mut freezer = Freezer::new(host, FreezerConfig::default());
//! freezer.register_generator(|| vec![RouteSpec::url("/hello?lang=en")], 50);
//! let stats = freezer.freeze().await?;
//! println!("froze {} pages", stats.pages);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod freezer;
pub mod host;
pub mod pipeline;
pub mod registry;
pub mod resolver;
pub mod state;

pub use error::{FreezeError, Result};
pub use freezer::{FreezeStats, Freezer};
pub use host::{AxumHost, Host, HostError, HostResponse};
pub use pipeline::Outcome;
pub use registry::{
    AppRoutes, DEFAULT_PRIORITY, GeneratorError, GeneratorRegistry, IntoRoutes, RouteGenerator,
};
pub use resolver::UrlResolver;
pub use state::FrozenState;
