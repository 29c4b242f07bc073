// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated requests.
//!
//! Use the `Auth` extractor in handlers to require a valid token:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(claims): Auth) -> impl IntoResponse {
//!     // claims.get("address") ...
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, Claims, RequestView};
use crate::state::AppState;

/// Extractor for requests carrying a valid, unexpired token.
///
/// The token is located with the configured lookup sources and checked
/// against the absolute timeout. Claims already placed in the request
/// extensions (by an upstream layer) are used as-is.
pub struct Auth(pub Claims);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>().cloned() {
            return Ok(Auth(claims));
        }

        let view = RequestView::from_parts(parts).await;
        let claims = state.auth.check_expire_and_parse(&view)?;

        parts.extensions.insert(claims.clone());
        Ok(Auth(claims))
    }
}

/// Optional authentication extractor.
///
/// Returns `None` if no valid authentication is present, instead of rejecting.
pub struct OptionalAuth(pub Option<Claims>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match Auth::from_request_parts(parts, state).await {
            Ok(Auth(claims)) => Ok(OptionalAuth(Some(claims))),
            Err(e) => {
                tracing::debug!(error = %e, "request is not authenticated");
                Ok(OptionalAuth(None))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{ClaimsMap, JwtAuthenticator, ManualClock};
    use crate::config::JwtConfig;
    use axum::http::Request;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    fn create_test_state() -> (AppState, ManualClock) {
        let clock = ManualClock::new(NOW);
        let auth = JwtAuthenticator::new(&JwtConfig {
            key: "extractor-secret".into(),
            ..JwtConfig::default()
        })
        .expect("valid config")
        .with_clock(clock.clone());
        (AppState::new(auth), clock)
    }

    fn issue(state: &AppState) -> String {
        let mut claims = ClaimsMap::new();
        claims.insert("address".into(), json!("0xabc"));
        state.auth.generate(claims).unwrap().token
    }

    #[tokio::test]
    async fn auth_extractor_requires_token() {
        let (state, _clock) = create_test_state();
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        // Default lookup ends with `cookie: jwt`
        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::EmptyCookieToken)));
    }

    #[tokio::test]
    async fn auth_extractor_accepts_bearer_header() {
        let (state, _clock) = create_test_state();
        let token = issue(&state);
        let mut parts = Request::builder()
            .uri("/test")
            .header("Authorization", format!("Bearer {token}"))
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let Auth(claims) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(claims.get("address"), Some(&json!("0xabc")));
        // Cached for later extractors
        assert!(parts.extensions.get::<Claims>().is_some());
    }

    #[tokio::test]
    async fn auth_extractor_accepts_cookie() {
        let (state, _clock) = create_test_state();
        let token = issue(&state);
        let mut parts = Request::builder()
            .uri("/test")
            .header("Cookie", format!("theme=dark; jwt={token}"))
            .body(())
            .unwrap()
            .into_parts()
            .0;

        assert!(Auth::from_request_parts(&mut parts, &state).await.is_ok());
    }

    #[tokio::test]
    async fn auth_extractor_rejects_expired_token() {
        let (state, clock) = create_test_state();
        let token = issue(&state);
        clock.advance(state.auth.timeout().as_secs() as i64 + 1);

        let mut parts = Request::builder()
            .uri(format!("/test?jwt={token}"))
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn auth_extractor_prefers_extensions() {
        let (state, _clock) = create_test_state();
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let mut extra = ClaimsMap::new();
        extra.insert("address".into(), json!("from-middleware"));
        parts.extensions.insert(Claims {
            issued_at: NOW,
            expires_at: NOW + 60,
            original_issued_at: None,
            extra,
        });

        let Auth(claims) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(claims.get("address"), Some(&json!("from-middleware")));
    }

    #[tokio::test]
    async fn optional_auth_returns_none_without_token() {
        let (state, _clock) = create_test_state();
        let mut parts = Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = OptionalAuth::from_request_parts(&mut parts, &state).await;
        assert!(result.unwrap().0.is_none());
    }
}
