// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session credential store adapters

mod redis;

pub use redis::RedisCredentialStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{CredentialCall, FakeCredentialStore};

use async_trait::async_trait;
use pantry_core::{Credential, EntityRef, SessionToken};
use thiserror::Error;

/// Errors from credential operations
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Token is unknown, already consumed, or expired
    #[error("invalid or expired session credential")]
    InvalidCredential,
    /// A stored record exists but its fields do not parse
    #[error("credential record corrupt: {0}")]
    Corrupt(String),
    #[error("credential store error: {0}")]
    Backend(String),
}

/// Store for short-lived connection credentials and the per-entity set of
/// currently attached sessions.
///
/// Credentials are single-use: `consume` removes the record while returning
/// the claims, so a token authorizes exactly one handshake. Records carry a
/// TTL at issue time as a safety net against tokens that never connect.
#[async_trait]
pub trait CredentialStore: Clone + Send + Sync + 'static {
    /// Mint an opaque token and persist the claims against it
    async fn issue(&self, credential: &Credential) -> Result<SessionToken, CredentialError>;

    /// Fetch and irrevocably remove the claims for a token
    async fn consume(&self, token: &SessionToken) -> Result<Credential, CredentialError>;

    /// Add the token to the entity's active-session set (used for fan-out)
    async fn attach(&self, entity: &EntityRef, token: &SessionToken)
        -> Result<(), CredentialError>;

    /// Remove the token from the entity's active-session set
    async fn detach(&self, entity: &EntityRef, token: &SessionToken)
        -> Result<(), CredentialError>;

    /// Every token currently attached to the entity, across all processes
    async fn active_tokens(&self, entity: &EntityRef)
        -> Result<Vec<SessionToken>, CredentialError>;
}
