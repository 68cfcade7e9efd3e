// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pantry list session daemon (pantryd)
//!
//! Foreground server process: binds the HTTP/WebSocket listener, wires the
//! engine to redis and Postgres, and shuts down cleanly on SIGTERM/SIGINT.

use pantry_adapters::{PgAdvisoryLock, PgItemStore, RedisCredentialStore};
use pantry_core::{SystemClock, UuidIdGen};
use pantry_engine::{EngineConfig, EngineDeps, SessionEngine};
use pantry_server::{router, ServerConfig, ServerEngine};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging();

    let config = ServerConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(16)
        .connect(&config.database_url)
        .await?;

    let redis_client = redis::Client::open(config.redis_url.as_str())?;
    let redis_manager = redis::aio::ConnectionManager::new(redis_client).await?;

    let engine: Arc<ServerEngine> = Arc::new(SessionEngine::new(
        EngineDeps {
            credentials: RedisCredentialStore::new(redis_manager, config.session_ttl),
            items: PgItemStore::new(pool.clone()),
            locks: PgAdvisoryLock::new(pool),
        },
        SystemClock,
        UuidIdGen,
        EngineConfig {
            idle_timeout: config.idle_timeout,
            ..EngineConfig::default()
        },
    ));

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("pantryd listening on {}", config.bind);

    axum::serve(listener, router(engine))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("pantryd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sig) => sig,
        Err(err) => {
            tracing::error!(%err, "failed to install SIGTERM handler");
            return std::future::pending::<()>().await;
        }
    };
    let mut sigint = match signal(SignalKind::interrupt()) {
        Ok(sig) => sig,
        Err(err) => {
            tracing::error!(%err, "failed to install SIGINT handler");
            return std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        _ = sigint.recv() => info!("Received SIGINT, shutting down..."),
    }
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}
