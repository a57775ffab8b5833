//! Routes command - lists the named routes of the application

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use frostline_freezer::Host;

use super::load_config;
use crate::demo;

/// Run the routes command.
///
/// Prints every named route with its pattern, marking the ones the default
/// generator leaves out.
pub fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let host = demo::app().wrap_err("Failed to build application")?;
    let routes = host.routes();

    let width = routes.names().map(str::len).max().unwrap_or(0);

    println!();
    for route in routes.iter() {
        let marker = if config.is_excluded(route.name()) {
            "  (excluded)"
        } else {
            ""
        };
        println!(
            "  {:<width$}  {}{marker}",
            route.name(),
            route.pattern()
        );
    }
    println!();
    println!("  {} route(s)", routes.len());
    println!();

    Ok(())
}
