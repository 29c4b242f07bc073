// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer token authentication with locally held keys.
//!
//! ## Token Flow
//!
//! 1. A login handler calls [`JwtAuthenticator::generate`] with the
//!    principal's claims and hands the token to the client
//! 2. The client presents the token in any configured lookup source
//!    (header, query parameter, cookie or path parameter)
//! 3. The `Auth` extractor locates the token, checks its algorithm and
//!    signature, then applies the absolute timeout
//! 4. Before the refresh window closes, the client exchanges the token via
//!    [`JwtAuthenticator::refresh`]
//!
//! ## Security
//!
//! - The token header must name exactly the configured algorithm
//! - RSA private keys only sign, public keys only verify
//! - Keys are loaded once at startup and never reloaded

pub mod algorithm;
pub mod authenticator;
pub mod claims;
pub mod clock;
pub mod error;
pub mod extractor;
pub mod keys;
pub mod lookup;
pub mod middleware;
pub mod request;

pub use algorithm::SigningAlgorithm;
pub use authenticator::{JwtAuthenticator, Verified};
pub use claims::{Claims, ClaimsMap, IssuedToken};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AuthError, SetupError};
pub use extractor::{Auth, OptionalAuth};
pub use keys::KeyMaterial;
pub use lookup::{parse_token_lookup, SourceKind, TokenLookup, TokenRequest};
pub use middleware::require_auth;
pub use request::RequestView;
