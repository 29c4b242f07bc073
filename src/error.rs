// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! API error envelope.
//!
//! Every failed request is answered with `{"code": <Code>, "message": <text>}`.
//! The status is derived from the code unless set explicitly.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Machine-readable failure code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Code {
    // request
    #[serde(rename = "ErrRequestAccessDenied")]
    RequestAccessDenied,
    #[serde(rename = "ErrRequestMethodNotFound")]
    RequestMethodNotFound,
    #[serde(rename = "ErrRequestParamInvalid")]
    RequestParamInvalid,
    // resource
    #[serde(rename = "ErrResourceNotFound")]
    ResourceNotFound,
    #[serde(rename = "ErrResourceAccessForbidden")]
    ResourceAccessForbidden,
    #[serde(rename = "ErrResourceConflict")]
    ResourceConflict,
    #[serde(rename = "ErrResourceDeleteForbidden")]
    ResourceDeleteForbidden,
    #[serde(rename = "ErrResourceHasBeenUsed")]
    ResourceHasBeenUsed,
    #[serde(rename = "ErrInvalidToken")]
    InvalidToken,
    #[serde(rename = "ErrTooManyRequests")]
    TooManyRequests,
    // unknown
    #[serde(rename = "UnknownError")]
    Unknown,
}

impl Code {
    /// Default HTTP status for this code.
    pub fn status(&self) -> StatusCode {
        match self {
            Code::ResourceNotFound | Code::RequestMethodNotFound => StatusCode::NOT_FOUND,
            Code::RequestAccessDenied => StatusCode::UNAUTHORIZED,
            Code::ResourceAccessForbidden | Code::ResourceHasBeenUsed => StatusCode::FORBIDDEN,
            Code::ResourceConflict => StatusCode::CONFLICT,
            Code::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Code::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: Code,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    code: Code,
    message: String,
}

impl ApiError {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            status: code.status(),
            code,
            message: message.into(),
        }
    }

    /// Override the status derived from the code.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(Code::RequestParamInvalid, message)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(status = %self.status, code = ?self.code, message = %self.message, "request failed");
        let body = Json(ErrorBody {
            code: self.code,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_code_and_status() {
        let nf = ApiError::new(Code::ResourceNotFound, "missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad.code, Code::RequestParamInvalid);

        let internal = ApiError::new(Code::Unknown, "boom");
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn status_table() {
        assert_eq!(Code::RequestAccessDenied.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(Code::ResourceHasBeenUsed.status(), StatusCode::FORBIDDEN);
        assert_eq!(Code::ResourceConflict.status(), StatusCode::CONFLICT);
        assert_eq!(Code::TooManyRequests.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(Code::RequestMethodNotFound.status(), StatusCode::NOT_FOUND);
        // Codes without an explicit entry fall back to 400
        assert_eq!(Code::InvalidToken.status(), StatusCode::BAD_REQUEST);
        assert_eq!(Code::ResourceDeleteForbidden.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn into_response_returns_json_envelope() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"code":"ErrRequestParamInvalid","message":"bad data"}"#);
    }

    #[tokio::test]
    async fn explicit_status_overrides_code_default() {
        let response = ApiError::new(Code::InvalidToken, "expired")
            .with_status(StatusCode::UNAUTHORIZED)
            .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
