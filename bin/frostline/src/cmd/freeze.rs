//! Freeze command - writes the application out as static files

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use frostline_freezer::{FreezeStats, Freezer};

use super::load_config;
use crate::demo;

/// Run the freeze command.
///
/// Freezes the demo application into the configured destination.
pub async fn run(
    config_path: &Path,
    output: Option<&Path>,
    exclude: &[String],
    no_discovery: bool,
) -> Result<FreezeStats> {
    tracing::info!(?config_path, ?output, ?exclude, no_discovery, "Starting freeze");

    let mut config = load_config(config_path)?;

    // Command line flags win over the configuration file
    if let Some(output) = output {
        config.destination = output.to_path_buf();
    }
    config.excluded_routes.extend(exclude.iter().cloned());
    if no_discovery {
        config.override_url_generator = false;
    }

    tracing::debug!(?config, "Loaded configuration");

    let destination = config.destination.clone();
    let host = demo::app().wrap_err("Failed to build application")?;
    let mut freezer = Freezer::new(host, config);
    demo::register_generators(&mut freezer);

    let stats = freezer.freeze().await.wrap_err("Freeze failed")?;

    println!();
    println!("  Freeze completed successfully!");
    println!();
    println!("  Pages:      {}", stats.pages);
    println!("  Routes:     {}", stats.routes);
    println!("  Discovered: {}", stats.discovered);
    println!("  Skipped:    {}", stats.skipped);
    println!("  Rejected:   {}", stats.rejected);
    println!("  Failed:     {}", stats.failed);
    println!();
    println!("  Duration:   {:.2}s", stats.duration_ms as f64 / 1000.0);
    println!("  Output:     {}", destination.display());
    println!();

    Ok(stats)
}
