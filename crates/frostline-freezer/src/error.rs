//! Freeze errors.
//!
//! Only failures that end the whole pass are errors. Per-route and per-URL
//! failures are absorbed by the pipeline and reported through
//! [`Outcome`](crate::pipeline::Outcome).

use std::path::PathBuf;

use thiserror::Error;

use crate::{host::HostError, registry::GeneratorError};

/// Result type for freeze operations.
pub type Result<T> = std::result::Result<T, FreezeError>;

/// Errors that abort a freeze.
#[derive(Debug, Error)]
pub enum FreezeError {
    /// The destination root could not be created.
    #[error("cannot create destination {}: {source}", path.display())]
    Destination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The host application failed to boot.
    #[error("host boot failed: {0}")]
    Boot(#[from] HostError),

    /// A generator failed while the abort policy is active.
    #[error("generator at priority {priority} failed: {source}")]
    Generator {
        priority: u64,
        #[source]
        source: GeneratorError,
    },
}
