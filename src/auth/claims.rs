// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and issued token representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved claim: issue time of this token.
pub const ISSUED_AT: &str = "iat";
/// Reserved claim: absolute expiry of this token.
pub const EXPIRES_AT: &str = "exp";
/// Reserved claim: issue time of the first token in a refresh chain.
pub const ORIGINAL_ISSUED_AT: &str = "orig_iat";

/// Caller supplied claims.
pub type ClaimsMap = Map<String, Value>;

/// Claims carried by every token this service issues.
///
/// The reserved timestamps are typed fields; any other key the caller put
/// into the token lives in `extra` and is handed back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Issued at (Unix seconds)
    #[serde(rename = "iat")]
    pub issued_at: i64,

    /// Expiration (Unix seconds)
    #[serde(rename = "exp")]
    pub expires_at: i64,

    /// Original issue time, preserved across refreshes
    #[serde(
        rename = "orig_iat",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub original_issued_at: Option<i64>,

    /// Everything else (subject, principal id, ...)
    #[serde(flatten)]
    pub extra: ClaimsMap,
}

impl Claims {
    /// Build claims for a fresh token. Reserved keys in `extra` are dropped.
    pub(crate) fn stamp(mut extra: ClaimsMap, now: i64, timeout: i64, origin: Option<i64>) -> Self {
        for key in [ISSUED_AT, EXPIRES_AT, ORIGINAL_ISSUED_AT] {
            extra.remove(key);
        }
        Self {
            issued_at: now,
            expires_at: now.saturating_add(timeout),
            original_issued_at: Some(origin.unwrap_or(now)),
            extra,
        }
    }

    /// Start of the refresh window.
    ///
    /// Tokens minted elsewhere may lack `orig_iat`; their own issue time is
    /// used instead.
    pub fn origin(&self) -> i64 {
        self.original_issued_at.unwrap_or(self.issued_at)
    }

    /// Look up a non-reserved claim.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// A freshly signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    /// Compact JWS string
    pub token: String,
    /// When the token stops passing the expiry check
    pub expire: DateTime<Utc>,
    /// Last moment at which the token can be refreshed
    pub max_refresh: DateTime<Utc>,
}
