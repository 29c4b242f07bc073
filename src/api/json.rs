// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON request body extractor.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// Like [`axum::Json`], but binding failures are answered with the API
/// error envelope (`ErrRequestParamInvalid`) instead of a plain-text body.
///
/// Missing fields are filled from `#[serde(default)]` on the target type.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
