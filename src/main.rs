// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::env;

use anyhow::Context;
use relational_auth::{
    api::router,
    auth::JwtAuthenticator,
    config::{bind_address, JwtConfig, DEFAULT_LOG_FILTER, LOG_FORMAT_ENV},
    state::AppState,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let config = JwtConfig::from_env();
    let auth = JwtAuthenticator::new(&config).context("failed to initialize JWT authenticator")?;
    tracing::info!(
        algorithm = %auth.algorithm(),
        timeout_secs = auth.timeout().as_secs(),
        max_refresh_secs = auth.max_refresh().as_secs(),
        "JWT authenticator ready"
    );

    let app = router(AppState::new(auth));

    let addr = bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("relational-auth listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// `LOG_FORMAT=json` switches to structured output.
fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = env::var(LOG_FORMAT_ENV).is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let subscriber = tracing_subscriber::registry().with(filter);
    if json {
        subscriber.with(fmt::layer().json()).try_init()?;
    } else {
        subscriber.with(fmt::layer()).try_init()?;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
