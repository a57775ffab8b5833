//! CLI command implementations.

pub mod freeze;
pub mod routes;
pub mod serve;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use frostline_core::FreezerConfig;

/// Load the configuration file, layered with `FROSTLINE__*` environment
/// variables. A missing file leaves every option at its default.
pub fn load_config(config_path: &Path) -> Result<FreezerConfig> {
    if !config_path.exists() {
        tracing::debug!(?config_path, "Configuration file not found, using defaults");
    }

    FreezerConfig::load_with_env(config_path).wrap_err("Failed to load configuration")
}
