// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process per-list locks

use super::{ListLock, LockError};
use async_trait::async_trait;
use dashmap::DashMap;
use pantry_core::ListId;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One tokio mutex per list, created on first use
///
/// Entries are never removed; the map is bounded by the number of lists this
/// process has ever mutated.
#[derive(Clone, Default)]
pub struct LocalListLock {
    locks: Arc<DashMap<ListId, Arc<Mutex<()>>>>,
}

impl LocalListLock {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ListLock for LocalListLock {
    type Guard = OwnedMutexGuard<()>;

    async fn acquire(&self, list_id: ListId) -> Result<Self::Guard, LockError> {
        let mutex = self.locks.entry(list_id).or_default().clone();
        Ok(mutex.lock_owned().await)
    }

    async fn release(&self, guard: Self::Guard) -> Result<(), LockError> {
        drop(guard);
        Ok(())
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
