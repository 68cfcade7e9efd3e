// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake item repository for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ItemStore, ItemStoreError};
use async_trait::async_trait;
use pantry_core::{Batch, Item, ListId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Recorded item store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemCall {
    ListExists { list_id: ListId },
    LoadAll { list_id: ListId },
    ApplyBatch { list_id: ListId, upserts: usize, deletes: usize },
}

#[derive(Default)]
struct FakeState {
    known_lists: HashSet<ListId>,
    items: HashMap<ListId, Vec<Item>>,
    calls: Vec<ItemCall>,
    // Configurable failure modes
    fail_next_apply: bool,
}

/// In-memory item repository with call recording for testing
#[derive(Clone, Default)]
pub struct FakeItemStore {
    state: Arc<Mutex<FakeState>>,
}

impl FakeItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a list known without seeding any items
    pub fn register_list(&self, list_id: ListId) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.known_lists.insert(list_id);
    }

    /// Seed stored items for a list (registers the list too)
    pub fn seed(&self, list_id: ListId, items: Vec<Item>) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.known_lists.insert(list_id);
        state.items.insert(list_id, items);
    }

    /// Current stored items for a list, in storage (insertion) order
    pub fn stored(&self, list_id: ListId) -> Vec<Item> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .items
            .get(&list_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Fail the next `apply_batch` without mutating stored state
    pub fn fail_next_apply(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.fail_next_apply = true;
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ItemCall> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }
}

#[async_trait]
impl ItemStore for FakeItemStore {
    async fn list_exists(&self, list_id: ListId) -> Result<bool, ItemStoreError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(ItemCall::ListExists { list_id });
        Ok(state.known_lists.contains(&list_id))
    }

    async fn load_all(&self, list_id: ListId) -> Result<Vec<Item>, ItemStoreError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(ItemCall::LoadAll { list_id });
        let mut items = state.items.get(&list_id).cloned().unwrap_or_default();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }

    async fn apply_batch(&self, list_id: ListId, batch: &Batch) -> Result<(), ItemStoreError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(ItemCall::ApplyBatch {
            list_id,
            upserts: batch.upserts.len(),
            deletes: batch.deletes.len(),
        });

        if state.fail_next_apply {
            state.fail_next_apply = false;
            return Err(ItemStoreError::Unavailable("injected failure".to_string()));
        }

        let items = state.items.entry(list_id).or_default();
        for upsert in &batch.upserts {
            match items.iter_mut().find(|item| item.id == upsert.id) {
                Some(existing) => *existing = upsert.clone(),
                None => items.push(upsert.clone()),
            }
        }
        items.retain(|item| !batch.deletes.contains(&item.id));
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
