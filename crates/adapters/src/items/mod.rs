// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Item repository adapters

mod postgres;

pub use postgres::PgItemStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeItemStore, ItemCall};

use async_trait::async_trait;
use pantry_core::{Batch, Item, ListId};
use thiserror::Error;

/// Errors from item repository operations
#[derive(Debug, Error)]
pub enum ItemStoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// Injected by test fakes and surfaced by transient outages
    #[error("item store unavailable: {0}")]
    Unavailable(String),
}

/// Transactional access to a list's items
///
/// `apply_batch` is all-or-nothing: a failed batch leaves stored state
/// exactly as it was, so readers never observe a half-applied reordering.
#[async_trait]
pub trait ItemStore: Clone + Send + Sync + 'static {
    /// Whether the list itself exists (list rows are owned by the CRUD layer)
    async fn list_exists(&self, list_id: ListId) -> Result<bool, ItemStoreError>;

    /// Every item belonging to the list, ordered by id
    async fn load_all(&self, list_id: ListId) -> Result<Vec<Item>, ItemStoreError>;

    /// Atomically persist a batch of upserts and deletes for the list
    async fn apply_batch(&self, list_id: ListId, batch: &Batch) -> Result<(), ItemStoreError>;
}
