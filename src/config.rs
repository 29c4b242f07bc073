// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup. [`JwtConfig`]
//! can also be deserialized from JSON, with the same defaults.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SIGNING_ALGORITHM` | `HS256`, `HS384`, `HS512`, `RS256`, `RS384` or `RS512` | `HS256` |
//! | `JWT_KEY` | HMAC secret | empty |
//! | `JWT_HS256_KEY` | HMAC secret used when `JWT_KEY` is empty | empty |
//! | `JWT_PRIVATE_KEY_FILE` | RSA private key (PEM), RS* only | empty |
//! | `JWT_PUBLIC_KEY_FILE` | RSA public key (PEM), RS* only | empty |
//! | `JWT_TIMEOUT_SECS` | Token lifetime | `1800` |
//! | `JWT_MAX_REFRESH_SECS` | Refresh window from original issue | `3600` |
//! | `JWT_TOKEN_LOOKUP` | Ordered `source:field` list | see [`DEFAULT_TOKEN_LOOKUP`] |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const JWT_SIGNING_ALGORITHM_ENV: &str = "JWT_SIGNING_ALGORITHM";
pub const JWT_KEY_ENV: &str = "JWT_KEY";
/// Fallback HMAC secret, consulted only when no secret is configured.
pub const JWT_FALLBACK_KEY_ENV: &str = "JWT_HS256_KEY";
pub const JWT_PRIVATE_KEY_FILE_ENV: &str = "JWT_PRIVATE_KEY_FILE";
pub const JWT_PUBLIC_KEY_FILE_ENV: &str = "JWT_PUBLIC_KEY_FILE";
pub const JWT_TIMEOUT_ENV: &str = "JWT_TIMEOUT_SECS";
pub const JWT_MAX_REFRESH_ENV: &str = "JWT_MAX_REFRESH_SECS";
pub const JWT_TOKEN_LOOKUP_ENV: &str = "JWT_TOKEN_LOOKUP";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

pub const DEFAULT_SIGNING_ALGORITHM: &str = "HS256";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_MAX_REFRESH: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_TOKEN_LOOKUP: &str =
    "header: jwt, header: Authorization, query: jwt, param: jwt, cookie: jwt";

/// Authenticator configuration.
///
/// Durations are expressed in whole seconds when (de)serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JwtConfig {
    pub signing_algorithm: String,
    /// HMAC secret (ignored for RS* algorithms). When missing or empty in a
    /// deserialized document, `JWT_HS256_KEY` is used instead.
    #[serde(default = "fallback_key", deserialize_with = "key_or_fallback")]
    pub key: String,
    pub private_key_file: PathBuf,
    pub public_key_file: PathBuf,
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Refresh window, measured from the first token of a refresh chain
    #[serde(with = "duration_secs")]
    pub max_refresh: Duration,
    pub token_lookup: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            signing_algorithm: DEFAULT_SIGNING_ALGORITHM.to_string(),
            key: String::new(),
            private_key_file: PathBuf::new(),
            public_key_file: PathBuf::new(),
            timeout: DEFAULT_TIMEOUT,
            max_refresh: DEFAULT_MAX_REFRESH,
            token_lookup: DEFAULT_TOKEN_LOOKUP.to_string(),
        }
    }
}

impl JwtConfig {
    /// Build a configuration from environment variables.
    ///
    /// Unset or unparseable values keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            signing_algorithm: env::var(JWT_SIGNING_ALGORITHM_ENV)
                .unwrap_or(defaults.signing_algorithm),
            key: env::var(JWT_KEY_ENV).unwrap_or_default(),
            private_key_file: env::var(JWT_PRIVATE_KEY_FILE_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.private_key_file),
            public_key_file: env::var(JWT_PUBLIC_KEY_FILE_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.public_key_file),
            timeout: env_secs(JWT_TIMEOUT_ENV).unwrap_or(defaults.timeout),
            max_refresh: env_secs(JWT_MAX_REFRESH_ENV).unwrap_or(defaults.max_refresh),
            token_lookup: env::var(JWT_TOKEN_LOOKUP_ENV).unwrap_or(defaults.token_lookup),
        };
        config.with_fallback_key(env::var(JWT_FALLBACK_KEY_ENV).ok())
    }

    /// Use `fallback` as the secret when none is configured.
    pub fn with_fallback_key(mut self, fallback: Option<String>) -> Self {
        if self.key.is_empty() {
            if let Some(fallback) = fallback {
                self.key = fallback;
            }
        }
        self
    }
}

fn fallback_key() -> String {
    env::var(JWT_FALLBACK_KEY_ENV).unwrap_or_default()
}

fn key_or_fallback<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let key = String::deserialize(deserializer)?;
    Ok(if key.is_empty() { fallback_key() } else { key })
}

fn env_secs(name: &str) -> Option<Duration> {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Server bind address from `HOST` and `PORT`.
pub fn bind_address() -> String {
    let host = env::var(HOST_ENV).unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var(PORT_ENV)
        .ok()
        .and_then(|port| port.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    format!("{host}:{port}")
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
