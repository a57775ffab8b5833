//! Route pattern parsing.
//!
//! Patterns use the axum path syntax: literal text, `{name}` parameters and a
//! trailing `{*name}` wildcard that may span several segments.

use std::fmt;

use crate::error::{Result, RouteError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Text(String),
    Param(String),
    Wildcard(String),
}

/// A parsed route pattern such as `/posts/{year}/{slug}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    tokens: Vec<Token>,
}

impl RoutePattern {
    /// Parse a pattern.
    pub fn parse(raw: &str) -> Result<Self> {
        if !raw.starts_with('/') {
            return Err(RouteError::invalid_pattern(raw, "must start with '/'"));
        }

        if let Some(segment) = raw
            .split('/')
            .find(|segment| segment.starts_with(':') || segment.starts_with('*'))
        {
            return Err(RouteError::invalid_pattern(
                raw,
                format!("segment `{segment}` must not start with ':' or '*', use `{{name}}`"),
            ));
        }

        let mut tokens = Vec::new();
        let mut rest = raw;

        while let Some(start) = rest.find('{') {
            let text = &rest[..start];
            if text.contains('}') {
                return Err(RouteError::invalid_pattern(raw, "unmatched '}'"));
            }
            if !text.is_empty() {
                tokens.push(Token::Text(text.to_string()));
            }

            let end = rest[start..]
                .find('}')
                .ok_or_else(|| RouteError::invalid_pattern(raw, "unclosed '{'"))?
                + start;
            let inner = rest[start + 1..end].trim();

            let token = match inner.strip_prefix('*') {
                Some(name) => Token::Wildcard(validate_name(raw, name)?),
                None => Token::Param(validate_name(raw, inner)?),
            };

            if let Some(name) = token_name(&token)
                && tokens.iter().any(|t| token_name(t) == Some(name))
            {
                return Err(RouteError::invalid_pattern(
                    raw,
                    format!("parameter `{name}` appears twice"),
                ));
            }

            tokens.push(token);
            rest = &rest[end + 1..];
        }

        if rest.contains('}') {
            return Err(RouteError::invalid_pattern(raw, "unmatched '}'"));
        }
        if !rest.is_empty() {
            tokens.push(Token::Text(rest.to_string()));
        }

        let wildcard_pos = tokens.iter().position(|t| matches!(t, Token::Wildcard(_)));
        if wildcard_pos.is_some_and(|pos| pos + 1 != tokens.len()) {
            return Err(RouteError::invalid_pattern(
                raw,
                "wildcard must be the last part of the pattern",
            ));
        }

        Ok(Self {
            raw: raw.to_string(),
            tokens,
        })
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of all parameters, in pattern order.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(token_name)
    }

    /// Whether the pattern uses the named parameter.
    #[must_use]
    pub fn has_param(&self, name: &str) -> bool {
        self.params().any(|p| p == name)
    }

    /// The pattern with parameter names erased, e.g. `/users/{}/{*}`.
    ///
    /// Two patterns with the same shape match the same requests.
    #[must_use]
    pub fn shape(&self) -> String {
        self.tokens
            .iter()
            .map(|token| match token {
                Token::Text(text) => text.as_str(),
                Token::Param(_) => "{}",
                Token::Wildcard(_) => "{*}",
            })
            .collect()
    }

    /// Whether the named parameter is the trailing wildcard.
    #[must_use]
    pub fn is_wildcard(&self, name: &str) -> bool {
        self.tokens
            .iter()
            .any(|t| matches!(t, Token::Wildcard(w) if w == name))
    }

    /// Substitute parameter values into the pattern.
    ///
    /// `value` is called once per parameter with its name and returns the raw
    /// value, which is percent-encoded here. Wildcard values keep their `/`
    /// separators.
    pub fn expand<F>(&self, mut value: F) -> Result<String>
    where
        F: FnMut(&str) -> Result<String>,
    {
        let mut path = String::with_capacity(self.raw.len());

        for token in &self.tokens {
            match token {
                Token::Text(text) => path.push_str(text),
                Token::Param(name) => {
                    path.push_str(&urlencoding::encode(&value(name.as_str())?));
                }
                Token::Wildcard(name) => {
                    let raw = value(name.as_str())?;
                    let encoded: Vec<_> = raw
                        .split('/')
                        .map(|segment| urlencoding::encode(segment).into_owned())
                        .collect();
                    path.push_str(&encoded.join("/"));
                }
            }
        }

        Ok(path)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn token_name(token: &Token) -> Option<&str> {
    match token {
        Token::Text(_) => None,
        Token::Param(name) | Token::Wildcard(name) => Some(name),
    }
}

fn validate_name(raw: &str, name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(RouteError::invalid_pattern(raw, "empty parameter name"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(RouteError::invalid_pattern(
            raw,
            format!("invalid parameter name `{name}`"),
        ));
    }
    Ok(name.to_string())
}
