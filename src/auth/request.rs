// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum adapter exposing request parts to the token lookup.

use std::collections::HashMap;
use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, RawPathParams},
    http::{header::COOKIE, request::Parts, HeaderMap},
};

use cookie::Cookie;

use super::lookup::TokenRequest;

/// Snapshot of the request locations a token may be read from.
///
/// Query parameters and cookies keep the first value seen for a name.
#[derive(Debug, Clone, Default)]
pub struct RequestView {
    headers: HeaderMap,
    query: HashMap<String, String>,
    cookies: HashMap<String, String>,
    params: HashMap<String, String>,
}

impl RequestView {
    /// Capture headers, query string, cookies and matched path parameters.
    pub async fn from_parts(parts: &mut Parts) -> Self {
        let mut view = Self {
            headers: parts.headers.clone(),
            query: parse_query(parts.uri.query().unwrap_or_default()),
            cookies: parse_cookies(&parts.headers),
            params: HashMap::new(),
        };

        // Only available when the request went through a router with path params
        match RawPathParams::from_request_parts(parts, &()).await {
            Ok(params) => {
                for (name, value) in &params {
                    view.params
                        .entry(name.to_string())
                        .or_insert_with(|| value.to_string());
                }
            }
            Err(rejection) => {
                tracing::trace!(%rejection, "no path parameters for token lookup");
            }
        }

        view
    }

    /// Add a path parameter, e.g. when the caller resolved routing itself.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestView {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestView::from_parts(parts).await)
    }
}

impl TokenRequest for RequestView {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

fn parse_query(query: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
        values
            .entry(name.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    values
}

/// Parse every `Cookie` header, percent-decoding values.
/// Malformed pairs are skipped.
fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for header in headers.get_all(COOKIE) {
        let Ok(header) = header.to_str() else {
            tracing::debug!("skipping non-ascii cookie header");
            continue;
        };
        for cookie in Cookie::split_parse_encoded(header) {
            match cookie {
                Ok(cookie) => {
                    cookies
                        .entry(cookie.name().to_string())
                        .or_insert_with(|| cookie.value_trimmed().to_string());
                }
                Err(error) => tracing::debug!(%error, "skipping malformed cookie"),
            }
        }
    }
    cookies
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn view(request: Request<()>) -> RequestView {
        let (mut parts, _) = request.into_parts();
        RequestView::from_parts(&mut parts).await
    }

    #[tokio::test]
    async fn reads_headers_case_insensitively() {
        let view = view(
            Request::builder()
                .uri("/test")
                .header("Authorization", "Bearer abc")
                .body(())
                .unwrap(),
        )
        .await;

        assert_eq!(view.header("authorization"), Some("Bearer abc"));
        assert_eq!(view.header("jwt"), None);
        // Invalid header names are simply absent
        assert_eq!(view.header("not a header"), None);
    }

    #[tokio::test]
    async fn reads_decoded_query_values() {
        let view = view(
            Request::builder()
                .uri("/test?jwt=a%2Eb.c&jwt=second&other=1")
                .body(())
                .unwrap(),
        )
        .await;

        assert_eq!(view.query("jwt"), Some("a.b.c"));
        assert_eq!(view.query("other"), Some("1"));
        assert_eq!(view.query("missing"), None);
    }

    #[tokio::test]
    async fn reads_cookies_and_skips_malformed_pairs() {
        let view = view(
            Request::builder()
                .uri("/test")
                .header("Cookie", "theme=dark; garbage; jwt=\"tok\"")
                .header("Cookie", "jwt=ignored; lang=en")
                .body(())
                .unwrap(),
        )
        .await;

        assert_eq!(view.cookie("jwt"), Some("tok"));
        assert_eq!(view.cookie("theme"), Some("dark"));
        assert_eq!(view.cookie("lang"), Some("en"));
        assert_eq!(view.cookie("garbage"), None);
    }

    #[tokio::test]
    async fn percent_decodes_cookie_values() {
        let view = view(
            Request::builder()
                .uri("/test")
                .header("Cookie", "jwt=a%2Eb.c; note=hello%20world")
                .body(())
                .unwrap(),
        )
        .await;

        assert_eq!(view.cookie("jwt"), Some("a.b.c"));
        assert_eq!(view.cookie("note"), Some("hello world"));
    }

    #[tokio::test]
    async fn params_empty_outside_router() {
        let view = view(Request::builder().uri("/t/abc").body(()).unwrap()).await;
        assert_eq!(view.param("jwt"), None);

        let view = view.with_param("jwt", "abc");
        assert_eq!(view.param("jwt"), Some("abc"));
    }
}
