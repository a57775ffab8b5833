//! Route references produced by generators.

use std::{collections::BTreeMap, fmt};

/// Route parameters, ordered by key so generated query strings are stable.
pub type Params = BTreeMap<String, String>;

/// A single item yielded by a generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteSpec {
    /// A named route of the host application plus its parameters.
    Named { name: String, params: Params },
    /// A literal URL requested as-is.
    Literal { url: String },
}

impl RouteSpec {
    /// Reference a named route without parameters.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            params: Params::new(),
        }
    }

    /// Reference a literal URL.
    #[must_use]
    pub fn url(url: impl Into<String>) -> Self {
        Self::Literal { url: url.into() }
    }

    /// Add a parameter to a named route. Literal URLs are returned unchanged.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Named { params, .. } = &mut self {
            params.insert(key.into(), value.into());
        }
        self
    }
}

impl From<&str> for RouteSpec {
    fn from(url: &str) -> Self {
        Self::url(url)
    }
}

impl From<String> for RouteSpec {
    fn from(url: String) -> Self {
        Self::Literal { url }
    }
}

impl fmt::Display for RouteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { name, params } if params.is_empty() => write!(f, "@{name}"),
            Self::Named { name, params } => {
                write!(f, "@{name}(")?;
                for (i, (k, v)) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}={v}")?;
                }
                f.write_str(")")
            }
            Self::Literal { url } => f.write_str(url),
        }
    }
}
