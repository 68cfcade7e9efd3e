// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-list mutation locks
//!
//! At most one load -> apply -> persist sequence runs for a given list at a
//! time; mutations on different lists proceed in parallel. `LocalListLock`
//! covers a single-process deployment; `PgAdvisoryLock` extends the same
//! guarantee across server processes sharing a database.

mod local;
mod postgres;

pub use local::LocalListLock;
pub use postgres::PgAdvisoryLock;

use async_trait::async_trait;
use pantry_core::ListId;
use thiserror::Error;

/// Errors from lock operations
#[derive(Debug, Error)]
pub enum LockError {
    #[error("lock backend error: {0}")]
    Backend(String),
}

/// Mutual exclusion per list
///
/// Guards must be passed back to `release`; holding one across unrelated
/// await points extends the critical section for every other writer on the
/// same list.
#[async_trait]
pub trait ListLock: Clone + Send + Sync + 'static {
    type Guard: Send + 'static;

    /// Block until this list's lock is available
    async fn acquire(&self, list_id: ListId) -> Result<Self::Guard, LockError>;

    /// Release a previously acquired guard
    async fn release(&self, guard: Self::Guard) -> Result<(), LockError>;
}
