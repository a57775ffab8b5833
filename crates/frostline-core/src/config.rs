//! Freezer configuration management.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for the freezer.
///
/// Every field falls back to its default when absent from the source, and a
/// value provided by the caller is never overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezerConfig {
    /// Root directory the frozen files are written under.
    #[serde(default = "default_destination")]
    pub destination: PathBuf,

    /// Whether the host's URL generator is replaced with one that freezes
    /// every route it generates a URL for.
    #[serde(default = "default_true")]
    pub override_url_generator: bool,

    /// Route names the default generator skips.
    #[serde(default)]
    pub excluded_routes: BTreeSet<String>,

    /// Which response statuses are written to disk.
    #[serde(default)]
    pub accept_status: StatusPolicy,

    /// What happens when a registered generator fails.
    #[serde(default)]
    pub on_generator_error: GeneratorErrorPolicy,

    /// What identifies a route that has already been frozen.
    #[serde(default)]
    pub dedupe_routes_by: RouteDedup,
}

/// Response statuses that count as a successful fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
    /// Only `200 OK`.
    #[default]
    Ok,
    /// Any status in the `2xx` range.
    Success,
}

impl StatusPolicy {
    /// Whether a response with `status` should be frozen.
    #[must_use]
    pub fn accepts(self, status: u16) -> bool {
        match self {
            Self::Ok => status == 200,
            Self::Success => (200..300).contains(&status),
        }
    }
}

/// Policy applied to a generator that returns an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorErrorPolicy {
    /// Log the failure and continue without that generator's routes.
    #[default]
    Skip,
    /// Abort the whole freeze.
    Abort,
}

/// Identity used to skip routes already frozen in a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteDedup {
    /// The route name alone: a route is frozen once, whatever its parameters.
    #[default]
    Name,
    /// The route name together with its parameters.
    Reference,
}

fn default_destination() -> PathBuf {
    PathBuf::from("build")
}

fn default_true() -> bool {
    true
}

impl Default for FreezerConfig {
    fn default() -> Self {
        Self {
            destination: default_destination(),
            override_url_generator: true,
            excluded_routes: BTreeSet::new(),
            accept_status: StatusPolicy::default(),
            on_generator_error: GeneratorErrorPolicy::default(),
            dedupe_routes_by: RouteDedup::default(),
        }
    }
}

impl FreezerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: FreezerConfig = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an optional TOML file layered with
    /// `FROSTLINE__*` environment variables (e.g. `FROSTLINE__DESTINATION=dist`).
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix("FROSTLINE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("excluded_routes")
                    .try_parsing(true),
            )
            .build()?;

        let config: FreezerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.destination.as_os_str().is_empty() {
            return Err(CoreError::config("destination cannot be empty"));
        }

        if self.excluded_routes.iter().any(String::is_empty) {
            tracing::warn!("excluded_routes contains an empty route name");
        }

        Ok(())
    }

    /// Set the destination directory.
    #[must_use]
    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = destination.into();
        self
    }

    /// Exclude a route from the default generator.
    #[must_use]
    pub fn exclude_route(mut self, name: impl Into<String>) -> Self {
        self.excluded_routes.insert(name.into());
        self
    }

    /// Whether the route is excluded from the default generator.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_routes.contains(name)
    }
}
