//! Route errors.

use thiserror::Error;

/// Result type for routing operations.
pub type Result<T> = std::result::Result<T, RouteError>;

/// Errors raised while registering routes or generating URLs.
#[derive(Debug, Error)]
pub enum RouteError {
    /// No route with that name.
    #[error("unknown route: {0}")]
    UnknownRoute(String),

    /// A route with that name is already registered.
    #[error("duplicate route name: {0}")]
    DuplicateRoute(String),

    /// A route with an equivalent pattern is already registered.
    #[error("pattern `{pattern}` overlaps with `{existing}`")]
    OverlappingPattern { pattern: String, existing: String },

    /// A parameter required by the pattern was neither supplied nor defaulted.
    #[error("route `{route}` is missing parameter `{param}`")]
    MissingParameter { route: String, param: String },

    /// A supplied value does not satisfy the parameter's requirement.
    #[error("parameter `{param}` of route `{route}` must match `{requirement}`, got `{value}`")]
    InvalidParameter {
        route: String,
        param: String,
        value: String,
        requirement: String,
    },

    /// Malformed route pattern.
    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Requirement is not a valid regular expression.
    #[error("invalid requirement for `{param}`: {source}")]
    InvalidRequirement {
        param: String,
        #[source]
        source: regex::Error,
    },
}

impl RouteError {
    /// Create a new invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}
