// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Construction problems ([`SetupError`]) are fatal: no authenticator is
//! produced. Per-request problems ([`AuthError`]) are returned to the caller
//! and never retried.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::error::{ApiError, Code};

/// Errors raised while building a [`JwtAuthenticator`](super::JwtAuthenticator).
#[derive(Debug, Error)]
pub enum SetupError {
    /// HMAC algorithm configured but no secret available
    #[error("secret key is required for HMAC signing")]
    MissingSecretKey,

    /// Algorithm name is not one of the supported HS*/RS* names
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Token lookup string could not be parsed
    #[error("invalid token lookup entry: {0:?}")]
    InvalidTokenLookup(String),

    /// Private key file could not be read
    #[error("failed to read private key file {path}")]
    NoPrivateKeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Public key file could not be read
    #[error("failed to read public key file {path}")]
    NoPublicKeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Private key file is not a PEM encoded RSA key
    #[error("private key is not a valid RSA PEM key")]
    InvalidPrivateKey(#[source] jsonwebtoken::errors::Error),

    /// Public key file is not a PEM encoded RSA key
    #[error("public key is not a valid RSA PEM key")]
    InvalidPublicKey(#[source] jsonwebtoken::errors::Error),
}

/// Per-request authentication error.
///
/// The four `Empty*` variants report the kind of the *last* lookup source
/// tried when no token was found.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token not found in request header")]
    EmptyAuthHeader,

    #[error("token not found in query string")]
    EmptyQueryToken,

    #[error("token not found in cookie")]
    EmptyCookieToken,

    #[error("token not found in path parameter")]
    EmptyParamToken,

    /// Token header names a different algorithm than the configured one
    #[error("token signing algorithm is invalid")]
    InvalidSigningAlgorithm,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token is malformed")]
    MalformedToken,

    /// Elapsed time since issue exceeds the absolute timeout
    #[error("token has expired")]
    TokenExpired,

    /// Elapsed time since the original issue exceeds the max refresh window
    #[error("token has expired and can no longer be refreshed")]
    RefreshExpired,

    #[error("failed to create token")]
    TokenCreation(#[source] jsonwebtoken::errors::Error),
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::EmptyAuthHeader => "empty_auth_header",
            AuthError::EmptyQueryToken => "empty_query_token",
            AuthError::EmptyCookieToken => "empty_cookie_token",
            AuthError::EmptyParamToken => "empty_param_token",
            AuthError::InvalidSigningAlgorithm => "invalid_signing_algorithm",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::MalformedToken => "malformed_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::RefreshExpired => "refresh_expired",
            AuthError::TokenCreation(_) => "token_creation_failed",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::TokenCreation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// True when no token could be located in the request.
    pub fn is_missing_token(&self) -> bool {
        matches!(
            self,
            AuthError::EmptyAuthHeader
                | AuthError::EmptyQueryToken
                | AuthError::EmptyCookieToken
                | AuthError::EmptyParamToken
        )
    }

    /// True for both the absolute timeout and the refresh window.
    pub fn is_expired(&self) -> bool {
        matches!(self, AuthError::TokenExpired | AuthError::RefreshExpired)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let code = if err.is_missing_token() {
            Code::RequestAccessDenied
        } else if matches!(err, AuthError::TokenCreation(_)) {
            Code::Unknown
        } else {
            Code::InvalidToken
        };
        ApiError::new(code, err.to_string()).with_status(err.status_code())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
