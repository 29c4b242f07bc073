// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::json::JsonBody;
use crate::{
    auth::{Auth, AuthError, Claims, IssuedToken, RequestView},
    state::AppState,
};

/// Return the claims of the presented token.
///
/// The token may come from any configured lookup source, including the
/// `{jwt}` path segment on `/v1/auth/claims/{jwt}`.
pub async fn claims(Auth(claims): Auth) -> Json<Claims> {
    Json(claims)
}

/// Exchange the presented token for a new one.
///
/// Works on expired tokens as long as the refresh window of the original
/// token is still open.
pub async fn refresh(
    State(state): State<AppState>,
    view: RequestView,
) -> Result<Json<IssuedToken>, AuthError> {
    let issued = state.auth.refresh(&view)?;
    tracing::info!(expire = %issued.expire, "token refreshed");
    Ok(Json(issued))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IntrospectRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct IntrospectResponse {
    /// Signature valid and absolute timeout not yet passed
    pub active: bool,
    /// Signature valid but `exp` is in the past
    pub expired: bool,
    pub claims: Claims,
}

/// Verify a token passed in the request body.
///
/// Tokens with a bad signature or algorithm are rejected; authentic but
/// expired tokens are reported with `active: false`.
pub async fn introspect(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<IntrospectRequest>,
) -> Result<Json<IntrospectResponse>, AuthError> {
    let verified = state.auth.verify(request.token.trim())?;
    let expired = verified.is_expired();

    Ok(Json(IntrospectResponse {
        active: !expired,
        expired,
        claims: verified.into_claims(),
    }))
}
