// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Postgres advisory locks for multi-process deployments
//!
//! The lock key is the list id in the session advisory-lock keyspace, which
//! this application reserves for list mutation serialization. The guard pins
//! a pooled connection for the duration of the critical section; `release`
//! must be called on every path, otherwise the lock outlives the guard for
//! as long as the underlying connection stays pooled.

use super::{ListLock, LockError};
use async_trait::async_trait;
use pantry_core::ListId;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use tracing::warn;

/// Advisory-lock serializer over a shared Postgres pool
#[derive(Clone)]
pub struct PgAdvisoryLock {
    pool: PgPool,
}

impl PgAdvisoryLock {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Holds the connection owning the advisory lock
pub struct PgAdvisoryGuard {
    conn: PoolConnection<Postgres>,
    key: i64,
}

#[async_trait]
impl ListLock for PgAdvisoryLock {
    type Guard = PgAdvisoryGuard;

    async fn acquire(&self, list_id: ListId) -> Result<Self::Guard, LockError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| LockError::Backend(e.to_string()))?;

        sqlx::query("select pg_advisory_lock($1)")
            .bind(list_id.0)
            .execute(&mut *conn)
            .await
            .map_err(|e| LockError::Backend(e.to_string()))?;

        Ok(PgAdvisoryGuard { conn, key: list_id.0 })
    }

    async fn release(&self, mut guard: Self::Guard) -> Result<(), LockError> {
        let unlocked: bool = sqlx::query_scalar("select pg_advisory_unlock($1)")
            .bind(guard.key)
            .fetch_one(&mut *guard.conn)
            .await
            .map_err(|e| LockError::Backend(e.to_string()))?;

        if !unlocked {
            warn!(key = guard.key, "advisory unlock released nothing");
        }
        Ok(())
    }
}
