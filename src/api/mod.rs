// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::Request,
    http::HeaderName,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    auth::require_auth,
    error::{ApiError, Code},
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod json;

pub use json::JsonBody;

/// Header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let protected = Router::new()
        .route("/v1/auth/claims", get(auth::claims))
        .route("/v1/auth/claims/{jwt}", get(auth::claims))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health::health))
        .merge(protected)
        .route("/v1/auth/refresh", post(auth::refresh))
        .route("/v1/auth/introspect", post(auth::introspect))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::new(Code::RequestMethodNotFound, "no route for this request")
}
