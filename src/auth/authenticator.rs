// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The token authenticator: issue, verify and refresh bearer tokens.
//!
//! ## Policies
//!
//! - **Expiry check**: a token passes while `now - iat <= timeout`.
//! - **Refresh check**: a token (expired or not) can be refreshed while
//!   `now - orig_iat <= max_refresh`. `orig_iat` is carried forward on every
//!   refresh, so a chain of refreshes never outlives the window of the first
//!   token.

use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Header, Validation};
use serde::Deserialize;
use tracing::Span;

use super::algorithm::SigningAlgorithm;
use super::claims::{Claims, ClaimsMap, IssuedToken};
use super::clock::{to_datetime, Clock, SystemClock};
use super::error::{AuthError, SetupError};
use super::keys::KeyMaterial;
use super::lookup::{parse_token_lookup, TokenLookup, TokenRequest};
use crate::config::JwtConfig;

/// Outcome of signature verification.
///
/// Expired tokens are still authentic; the refresh path relies on that.
#[derive(Debug, Clone, PartialEq)]
pub enum Verified {
    Valid(Claims),
    Expired(Claims),
}

impl Verified {
    pub fn into_claims(self) -> Claims {
        match self {
            Verified::Valid(claims) | Verified::Expired(claims) => claims,
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Verified::Expired(_))
    }
}

/// Which window a check measures against.
#[derive(Debug, Clone, Copy)]
enum Window {
    Timeout,
    MaxRefresh,
}

#[derive(Deserialize)]
struct AlgorithmHeader {
    alg: String,
}

/// Issues and validates JWTs for one configured algorithm and key set.
///
/// Immutable after construction and safe to share between request handlers.
#[derive(Clone)]
pub struct JwtAuthenticator {
    algorithm: SigningAlgorithm,
    keys: KeyMaterial,
    timeout: Duration,
    max_refresh: Duration,
    lookups: Vec<TokenLookup>,
    validation: Validation,
    clock: Arc<dyn Clock>,
    span: Span,
}

impl JwtAuthenticator {
    /// Build an authenticator from configuration.
    ///
    /// RS* algorithms load both PEM files; HS* algorithms need a non-empty
    /// secret. Nothing is returned unless every piece is usable.
    pub fn new(config: &JwtConfig) -> Result<Self, SetupError> {
        let algorithm: SigningAlgorithm = config.signing_algorithm.parse()?;
        let lookups = parse_token_lookup(&config.token_lookup)?;

        let keys = if algorithm.is_asymmetric() {
            KeyMaterial::from_rsa_files(&config.private_key_file, &config.public_key_file)?
        } else {
            KeyMaterial::from_secret(config.key.as_bytes())?
        };

        // Expiry is enforced by our own policy checks against the injected clock
        let mut validation = Validation::new(algorithm.jwt_algorithm());
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let span = tracing::debug_span!("jwt_helper", algorithm = %algorithm);
        tracing::debug!(parent: &span, lookups = lookups.len(), "authenticator ready");

        Ok(Self {
            algorithm,
            keys,
            timeout: config.timeout,
            max_refresh: config.max_refresh,
            lookups,
            validation,
            clock: Arc::new(SystemClock),
            span,
        })
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replace the span all diagnostics are emitted under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_refresh(&self) -> Duration {
        self.max_refresh
    }

    /// Find the token in a request, trying lookup sources in order.
    ///
    /// When every source is empty the error names the kind of the last one.
    pub fn token_string<R: TokenRequest + ?Sized>(&self, request: &R) -> Result<String, AuthError> {
        let mut last = None;
        for lookup in &self.lookups {
            if let Some(token) = lookup.read(request) {
                return Ok(token.to_string());
            }
            tracing::debug!(
                parent: &self.span,
                source = %lookup.kind,
                field = %lookup.field,
                "failed to get jwt from {}",
                lookup.kind
            );
            last = Some(lookup.kind);
        }

        // Lookups are never empty after construction
        Err(last
            .map(|kind| kind.missing_error())
            .unwrap_or(AuthError::EmptyAuthHeader))
    }

    /// Verify a token's algorithm and signature and decode its claims.
    pub fn verify(&self, token: &str) -> Result<Verified, AuthError> {
        let alg = header_algorithm(token)?;
        if alg != self.algorithm.as_str() {
            tracing::debug!(
                parent: &self.span,
                expected = %self.algorithm,
                found = %alg,
                "rejecting token signed with unexpected algorithm"
            );
            return Err(AuthError::InvalidSigningAlgorithm);
        }

        let data = decode::<Claims>(token, self.keys.decoding_key(), &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::InvalidAlgorithm => AuthError::InvalidSigningAlgorithm,
                _ => AuthError::MalformedToken,
            },
        )?;

        let claims = data.claims;
        if self.clock.now() > claims.expires_at {
            Ok(Verified::Expired(claims))
        } else {
            Ok(Verified::Valid(claims))
        }
    }

    /// Extract and verify the request's token, then apply the timeout.
    pub fn check_expire_and_parse<R: TokenRequest + ?Sized>(
        &self,
        request: &R,
    ) -> Result<Claims, AuthError> {
        let token = self.token_string(request)?;
        self.check_token(&token, Window::Timeout)
    }

    /// Extract and verify the request's token, then apply the refresh window.
    pub fn check_max_refresh_and_parse<R: TokenRequest + ?Sized>(
        &self,
        request: &R,
    ) -> Result<Claims, AuthError> {
        let token = self.token_string(request)?;
        self.check_token(&token, Window::MaxRefresh)
    }

    /// Timeout check on a token string that was obtained elsewhere.
    pub fn check_expire(&self, token: &str) -> Result<Claims, AuthError> {
        self.check_token(token, Window::Timeout)
    }

    fn check_token(&self, token: &str, window: Window) -> Result<Claims, AuthError> {
        let claims = self.verify(token)?.into_claims();
        let now = self.clock.now();

        let (start, limit, expired) = match window {
            Window::Timeout => (claims.issued_at, self.timeout, AuthError::TokenExpired),
            Window::MaxRefresh => (claims.origin(), self.max_refresh, AuthError::RefreshExpired),
        };

        if now.saturating_sub(start) > secs(limit) {
            tracing::debug!(parent: &self.span, ?window, start, now, "token outside its window");
            return Err(expired);
        }
        Ok(claims)
    }

    /// Sign a new token for the given caller claims.
    ///
    /// Reserved timestamps in `claims` are overwritten.
    pub fn generate(&self, claims: ClaimsMap) -> Result<IssuedToken, AuthError> {
        self.issue(claims, None)
    }

    /// Issue a replacement for the request's token if its refresh window is
    /// still open. Caller claims are carried over unchanged.
    pub fn refresh<R: TokenRequest + ?Sized>(&self, request: &R) -> Result<IssuedToken, AuthError> {
        let claims = self.check_max_refresh_and_parse(request)?;
        let origin = claims.origin();
        self.issue(claims.extra, Some(origin))
    }

    /// [`refresh`](Self::refresh) for a token string obtained elsewhere.
    pub fn refresh_token(&self, token: &str) -> Result<IssuedToken, AuthError> {
        let claims = self.check_token(token, Window::MaxRefresh)?;
        let origin = claims.origin();
        self.issue(claims.extra, Some(origin))
    }

    fn issue(&self, extra: ClaimsMap, origin: Option<i64>) -> Result<IssuedToken, AuthError> {
        let now = self.clock.now();
        let claims = Claims::stamp(extra, now, secs(self.timeout), origin);

        let header = Header::new(self.algorithm.jwt_algorithm());
        let token = encode(&header, &claims, self.keys.encoding_key()).map_err(|e| {
            tracing::warn!(parent: &self.span, error = %e, "failed to sign token");
            AuthError::TokenCreation(e)
        })?;

        Ok(IssuedToken {
            token,
            expire: to_datetime(claims.expires_at),
            max_refresh: to_datetime(claims.origin().saturating_add(secs(self.max_refresh))),
        })
    }
}

impl std::fmt::Debug for JwtAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuthenticator")
            .field("algorithm", &self.algorithm)
            .field("keys", &self.keys)
            .field("timeout", &self.timeout)
            .field("max_refresh", &self.max_refresh)
            .field("lookups", &self.lookups)
            .finish_non_exhaustive()
    }
}

fn secs(duration: Duration) -> i64 {
    i64::try_from(duration.as_secs()).unwrap_or(i64::MAX)
}

/// Read the `alg` field of a compact JWS header without trusting anything else.
fn header_algorithm(token: &str) -> Result<String, AuthError> {
    let encoded = token.split('.').next().unwrap_or_default();
    let raw = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| AuthError::MalformedToken)?;
    let header: AlgorithmHeader =
        serde_json::from_slice(&raw).map_err(|_| AuthError::MalformedToken)?;
    Ok(header.alg)
}
