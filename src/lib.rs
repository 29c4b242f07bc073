// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Auth - Bearer Token Authentication
//!
//! Issues, verifies and refreshes signed JWTs for Axum services.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token authenticator, lookup sources and extractors
//! - `config` - Environment-driven configuration
//! - `error` - API error envelope

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
