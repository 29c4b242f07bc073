// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token lookup: where in a request to search for the bearer token.
//!
//! A lookup string lists `source:field` pairs in priority order, separated
//! by commas, e.g. `header: Authorization, query: jwt, cookie: jwt`.
//! Supported sources are `header`, `query`, `cookie` and `param` (a matched
//! path parameter).

use std::str::FromStr;

use super::error::{AuthError, SetupError};

/// Prefix stripped from header values, if present.
const BEARER_PREFIX: &str = "Bearer ";

/// Request location a token can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Header,
    Query,
    Cookie,
    Param,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Header => "header",
            SourceKind::Query => "query",
            SourceKind::Cookie => "cookie",
            SourceKind::Param => "param",
        }
    }

    /// Error reported when this was the last source tried and it was empty.
    pub(crate) fn missing_error(&self) -> AuthError {
        match self {
            SourceKind::Header => AuthError::EmptyAuthHeader,
            SourceKind::Query => AuthError::EmptyQueryToken,
            SourceKind::Cookie => AuthError::EmptyCookieToken,
            SourceKind::Param => AuthError::EmptyParamToken,
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `source:field` entry of a lookup string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLookup {
    pub kind: SourceKind,
    pub field: String,
}

impl FromStr for TokenLookup {
    type Err = SetupError;

    fn from_str(entry: &str) -> Result<Self, Self::Err> {
        let invalid = || SetupError::InvalidTokenLookup(entry.trim().to_string());

        let (kind, field) = entry.split_once(':').ok_or_else(invalid)?;
        let field = field.trim();
        if field.is_empty() {
            return Err(invalid());
        }

        let kind = match kind.trim() {
            "header" => SourceKind::Header,
            "query" => SourceKind::Query,
            "cookie" => SourceKind::Cookie,
            "param" => SourceKind::Param,
            _ => return Err(invalid()),
        };

        Ok(Self {
            kind,
            field: field.to_string(),
        })
    }
}

/// Parse a full lookup string. At least one entry is required.
pub fn parse_token_lookup(spec: &str) -> Result<Vec<TokenLookup>, SetupError> {
    let lookups = spec
        .split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(str::parse::<TokenLookup>)
        .collect::<Result<Vec<TokenLookup>, _>>()?;

    if lookups.is_empty() {
        return Err(SetupError::InvalidTokenLookup(spec.to_string()));
    }
    Ok(lookups)
}

/// Read access to the parts of an incoming request a token may live in.
///
/// Accessors return `None` when the value is absent.
pub trait TokenRequest {
    fn header(&self, name: &str) -> Option<&str>;
    fn query(&self, name: &str) -> Option<&str>;
    fn cookie(&self, name: &str) -> Option<&str>;
    fn param(&self, name: &str) -> Option<&str>;
}

impl TokenLookup {
    /// Read this entry's value from the request. Empty values count as absent.
    pub fn read<'r, R: TokenRequest + ?Sized>(&self, request: &'r R) -> Option<&'r str> {
        let raw = match self.kind {
            SourceKind::Header => request.header(&self.field).map(strip_bearer),
            SourceKind::Query => request.query(&self.field),
            SourceKind::Cookie => request.cookie(&self.field),
            SourceKind::Param => request.param(&self.field),
        };
        raw.map(str::trim).filter(|value| !value.is_empty())
    }
}

/// Drop a leading `Bearer ` scheme, matched case-insensitively.
fn strip_bearer(value: &str) -> &str {
    match value.get(..BEARER_PREFIX.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(BEARER_PREFIX) => {
            &value[BEARER_PREFIX.len()..]
        }
        _ => value,
    }
}
