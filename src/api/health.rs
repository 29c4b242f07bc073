// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

/// Liveness response, including the active signing algorithm.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub algorithm: String,
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running. Keys are loaded before the
/// router is built, so a running server can always sign and verify.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        algorithm: state.auth.algorithm().to_string(),
    })
}
