// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::JwtAuthenticator;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<JwtAuthenticator>,
}

impl AppState {
    pub fn new(auth: JwtAuthenticator) -> Self {
        Self {
            auth: Arc::new(auth),
        }
    }
}
