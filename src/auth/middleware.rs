// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Middleware counterpart of the [`Auth`](super::Auth) extractor, for guarding
//! a whole router subtree:
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/me", get(me))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));
//! ```
//!
//! Verified claims are stored in the request extensions, where `Auth` picks
//! them up without verifying the token a second time. Use `route_layer` so
//! that path parameters are already matched when the lookup runs.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::{AuthError, RequestView};
use crate::state::AppState;

/// Reject requests without a valid, unexpired token.
pub async fn require_auth(
    State(state): State<AppState>,
    view: RequestView,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = state.auth.check_expire_and_parse(&view)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Auth, ClaimsMap, JwtAuthenticator};
    use crate::config::JwtConfig;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use serde_json::json;
    use tower::ServiceExt;

    fn app() -> (Router, AppState) {
        let auth = JwtAuthenticator::new(&JwtConfig {
            key: "middleware-secret".into(),
            ..JwtConfig::default()
        })
        .unwrap();
        let state = AppState::new(auth);

        let router = Router::new()
            .route(
                "/me",
                get(|Auth(claims): Auth| async move {
                    claims.get("sub").cloned().unwrap_or_default().to_string()
                }),
            )
            .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
            .with_state(state.clone());
        (router, state)
    }

    #[tokio::test]
    async fn rejects_request_without_token() {
        let (app, _state) = app();

        let response = app
            .oneshot(Request::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn passes_claims_to_handler() {
        let (app, state) = app();
        let mut claims = ClaimsMap::new();
        claims.insert("sub".into(), json!("alice"));
        let token = state.auth.generate(claims).unwrap().token;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/me")
                    .header("jwt", token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"\"alice\"");
    }
}
