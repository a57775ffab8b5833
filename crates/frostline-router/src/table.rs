//! Route table keyed by route name.

use std::collections::{BTreeMap, HashMap};

use frostline_core::Params;
use regex::Regex;

use crate::{
    error::{Result, RouteError},
    pattern::RoutePattern,
};

/// A named route of the host application.
#[derive(Debug, Clone)]
pub struct Route {
    name: String,
    pattern: RoutePattern,
    defaults: Params,
    requirements: BTreeMap<String, (String, Regex)>,
}

impl Route {
    /// Create a route from its name and pattern.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            pattern: RoutePattern::parse(pattern)?,
            defaults: Params::new(),
            requirements: BTreeMap::new(),
        })
    }

    /// Set the value used when `param` is not supplied.
    #[must_use]
    pub fn with_default(mut self, param: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(param.into(), value.into());
        self
    }

    /// Require values of `param` to fully match the regular expression.
    pub fn with_requirement(mut self, param: impl Into<String>, requirement: &str) -> Result<Self> {
        let param = param.into();
        let regex = Regex::new(&format!("^(?:{requirement})$")).map_err(|source| {
            RouteError::InvalidRequirement {
                param: param.clone(),
                source,
            }
        })?;
        self.requirements
            .insert(param, (requirement.to_string(), regex));
        Ok(self)
    }

    /// Route name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Route pattern.
    #[must_use]
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    /// Generate the URL path for this route.
    ///
    /// Supplied parameters that the pattern does not use are appended as a
    /// query string, ordered by key.
    pub fn generate(&self, params: &Params) -> Result<String> {
        let mut url = self.pattern.expand(|param| {
            let value = params
                .get(param)
                .or_else(|| self.defaults.get(param))
                .ok_or_else(|| RouteError::MissingParameter {
                    route: self.name.clone(),
                    param: param.to_string(),
                })?;

            if let Some((requirement, regex)) = self.requirements.get(param) {
                if !regex.is_match(value) {
                    return Err(self.invalid(param, value, requirement));
                }
            } else if value.is_empty() && !self.pattern.is_wildcard(param) {
                return Err(self.invalid(param, value, ".+"));
            }

            Ok(value.clone())
        })?;

        let query: Vec<_> = params
            .iter()
            .filter(|(key, _)| !self.pattern.has_param(key.as_str()))
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect();

        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }

        Ok(url)
    }

    fn invalid(&self, param: &str, value: &str, requirement: &str) -> RouteError {
        RouteError::InvalidParameter {
            route: self.name.clone(),
            param: param.to_string(),
            value: value.to_string(),
            requirement: requirement.to_string(),
        }
    }
}

/// Routes in registration order, looked up by name.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    index: HashMap<String, usize>,
}

impl RouteTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route. Route names are unique, and so are patterns up to
    /// the names of their parameters.
    pub fn add(&mut self, route: Route) -> Result<()> {
        if self.index.contains_key(route.name()) {
            return Err(RouteError::DuplicateRoute(route.name().to_string()));
        }
        let shape = route.pattern().shape();
        if let Some(existing) = self.routes.iter().find(|r| r.pattern().shape() == shape) {
            return Err(RouteError::OverlappingPattern {
                pattern: route.pattern().to_string(),
                existing: existing.pattern().to_string(),
            });
        }
        self.index.insert(route.name().to_string(), self.routes.len());
        self.routes.push(route);
        Ok(())
    }

    /// Look up a route by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Route> {
        self.index.get(name).map(|&i| &self.routes[i])
    }

    /// Whether a route with that name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate routes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Route names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(Route::name)
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Generate the URL for a named route.
    pub fn generate(&self, name: &str, params: &Params) -> Result<String> {
        self.get(name)
            .ok_or_else(|| RouteError::UnknownRoute(name.to_string()))?
            .generate(params)
    }
}
