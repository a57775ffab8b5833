//! Frostline CLI Library
//!
//! Command implementations for the `frostline` binary, plus the demo
//! application it freezes.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (freeze, routes, serve)
//! - [`demo`] - The bundled demo application
//! - [`server`] - Static preview server for frozen output
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! # async fn run() -> color_eyre::eyre::Result<()> {
//! frostline::cmd::freeze::run(Path::new("frostline.toml"), None, &[], false).await?;
//! # Ok(())
//! # }
//! ```

pub mod cmd;
pub mod demo;
pub mod server;

pub use frostline_core::FreezerConfig;
pub use frostline_freezer::{FreezeStats, Freezer};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
