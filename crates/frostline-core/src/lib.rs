//! Frostline Core Library
//!
//! Core types, configuration, and error handling for the Frostline site freezer.

pub mod config;
pub mod error;
pub mod path;
pub mod route;

pub use config::{FreezerConfig, GeneratorErrorPolicy, RouteDedup, StatusPolicy};
pub use error::{CoreError, Result};
pub use path::url_to_path;
pub use route::{Params, RouteSpec};
