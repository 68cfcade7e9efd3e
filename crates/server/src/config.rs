// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server configuration from the environment

use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_TTL_SECS: u64 = 300;
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 90;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP/WebSocket listener binds to
    pub bind: SocketAddr,
    /// Postgres connection string (items and advisory locks)
    pub database_url: String,
    /// Redis connection string (session credentials)
    pub redis_url: String,
    /// TTL on issued-but-unconnected session credentials
    pub session_ttl: Duration,
    /// Close connections with no inbound frame for this long
    pub idle_timeout: Duration,
}

impl ServerConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup (testing seam)
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_raw = get("PANTRY_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "PANTRY_BIND",
            value: bind_raw.clone(),
        })?;

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let redis_url = get("REDIS_URL").ok_or(ConfigError::Missing("REDIS_URL"))?;

        let session_ttl = seconds(&get, "PANTRY_SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;
        let idle_timeout = seconds(&get, "PANTRY_IDLE_TIMEOUT_SECS", DEFAULT_IDLE_TIMEOUT_SECS)?;

        Ok(Self {
            bind,
            database_url,
            redis_url,
            session_ttl,
            idle_timeout,
        })
    }
}

fn seconds(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u64,
) -> Result<Duration, ConfigError> {
    match get(key) {
        None => Ok(Duration::from_secs(default)),
        Some(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
