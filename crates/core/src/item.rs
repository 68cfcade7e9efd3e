// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shopping list item model
//!
//! An item belongs to exactly one list and to exactly one partition within
//! that list (the subset of items sharing its `completed` flag). Within a
//! partition, `order` values are contiguous starting at 1; the ordering
//! engine re-establishes that invariant after every mutation.

use serde::{Deserialize, Serialize};

/// Unique identifier for a shopping list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListId(pub i64);

impl std::fmt::Display for ListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a list item, stable across the item's lifetime
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single entry on a shopping list
///
/// The wire shape matches the client contract: `list_id` serializes as
/// `shopping_list_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "shopping_list_id")]
    pub list_id: ListId,
    pub content: String,
    pub notes: Option<String>,
    pub completed: bool,
    /// 1-based position within the item's partition
    pub order: i32,
}
