//! Frostline Router Library
//!
//! Named, parameterized routes of the host application and URL generation.
//!
//! # Modules
//!
//! - [`pattern`] - Route pattern parsing and substitution
//! - [`table`] - Route table keyed by route name
//! - [`generator`] - URL generator capability and its freezing decorator

pub mod error;
pub mod generator;
pub mod pattern;
pub mod table;

pub use error::{Result, RouteError};
pub use generator::{DiscoveryQueue, FreezingUrlGenerator, SharedUrlGenerator, UrlGenerator};
pub use pattern::RoutePattern;
pub use table::{Route, RouteTable};
