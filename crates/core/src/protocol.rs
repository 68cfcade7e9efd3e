// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol for list modification sessions
//!
//! Clients send `{"action": <string>, "item"?: {..partial item..}}`; the
//! server answers every non-ping action with a full snapshot
//! `{"responding_to_action": <string>, "items": [..]}` fanned out to every
//! connection attached to the same list. `__ping__` is acknowledged to the
//! sender only.

use crate::item::{Item, ItemId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ACTION_CURRENT_ITEMS: &str = "current_items";
pub const ACTION_ADD_ITEM: &str = "add_item";
pub const ACTION_DELETE_ITEM: &str = "delete_item";
pub const ACTION_MARK_ITEM_COMPLETE: &str = "mark_item_complete";
pub const ACTION_MARK_ITEM_INCOMPLETE: &str = "mark_item_incomplete";
pub const ACTION_SET_ITEM_CONTENT: &str = "set_item_content";
pub const ACTION_SET_ITEM_NOTES: &str = "set_item_notes";
pub const ACTION_SET_ITEM_ORDER: &str = "set_item_order";
pub const ACTION_CLEAR_ITEMS: &str = "clear_items";
pub const ACTION_PING: &str = "__ping__";

/// Client -> server message envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ClientEnvelope {
    pub action: String,
    #[serde(default)]
    pub item: Option<ItemPatch>,
}

/// Partial item fields carried in a client envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPatch {
    pub id: Option<String>,
    pub content: Option<String>,
    pub notes: Option<String>,
    pub completed: Option<bool>,
    pub order: Option<i32>,
}

/// Server -> client snapshot envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub responding_to_action: String,
    pub items: Vec<Item>,
}

impl Snapshot {
    pub fn new(responding_to_action: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            responding_to_action: responding_to_action.into(),
            items,
        }
    }

    /// Minimal keepalive acknowledgement, delivered only to the sender
    pub fn ping_ack() -> Self {
        Self::new(ACTION_PING, Vec::new())
    }
}

/// A parsed, validated list action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    CurrentItems,
    AddItem {
        content: String,
        notes: Option<String>,
        completed: bool,
    },
    DeleteItem {
        id: ItemId,
    },
    MarkItemComplete {
        id: ItemId,
    },
    MarkItemIncomplete {
        id: ItemId,
    },
    SetItemContent {
        id: ItemId,
        content: String,
    },
    SetItemNotes {
        id: ItemId,
        notes: Option<String>,
    },
    SetItemOrder {
        id: ItemId,
        order: i32,
    },
    ClearItems,
    Ping,
}

impl ListAction {
    /// The wire name echoed back as `responding_to_action`
    pub fn name(&self) -> &'static str {
        match self {
            ListAction::CurrentItems => ACTION_CURRENT_ITEMS,
            ListAction::AddItem { .. } => ACTION_ADD_ITEM,
            ListAction::DeleteItem { .. } => ACTION_DELETE_ITEM,
            ListAction::MarkItemComplete { .. } => ACTION_MARK_ITEM_COMPLETE,
            ListAction::MarkItemIncomplete { .. } => ACTION_MARK_ITEM_INCOMPLETE,
            ListAction::SetItemContent { .. } => ACTION_SET_ITEM_CONTENT,
            ListAction::SetItemNotes { .. } => ACTION_SET_ITEM_NOTES,
            ListAction::SetItemOrder { .. } => ACTION_SET_ITEM_ORDER,
            ListAction::ClearItems => ACTION_CLEAR_ITEMS,
            ListAction::Ping => ACTION_PING,
        }
    }

    /// Whether this action may change list state
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            ListAction::CurrentItems | ListAction::Ping
        )
    }
}

/// Errors from parsing a client message
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unparseable payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("action {action} requires an item payload")]
    MissingItem { action: &'static str },
    #[error("action {action} requires item field {field}")]
    MissingField {
        action: &'static str,
        field: &'static str,
    },
}

/// Parse a raw text frame into a validated action
pub fn parse_message(text: &str) -> Result<ListAction, ParseError> {
    let envelope: ClientEnvelope = serde_json::from_str(text)?;
    action_from_envelope(envelope)
}

fn action_from_envelope(envelope: ClientEnvelope) -> Result<ListAction, ParseError> {
    let ClientEnvelope { action, item } = envelope;
    match action.as_str() {
        ACTION_CURRENT_ITEMS => Ok(ListAction::CurrentItems),
        ACTION_CLEAR_ITEMS => Ok(ListAction::ClearItems),
        ACTION_PING => Ok(ListAction::Ping),
        ACTION_ADD_ITEM => {
            let patch = require_item(item, ACTION_ADD_ITEM)?;
            let content = patch.content.ok_or(ParseError::MissingField {
                action: ACTION_ADD_ITEM,
                field: "content",
            })?;
            Ok(ListAction::AddItem {
                content,
                notes: patch.notes,
                completed: patch.completed.unwrap_or(false),
            })
        }
        ACTION_DELETE_ITEM => {
            let id = require_id(item, ACTION_DELETE_ITEM)?;
            Ok(ListAction::DeleteItem { id })
        }
        ACTION_MARK_ITEM_COMPLETE => {
            let id = require_id(item, ACTION_MARK_ITEM_COMPLETE)?;
            Ok(ListAction::MarkItemComplete { id })
        }
        ACTION_MARK_ITEM_INCOMPLETE => {
            let id = require_id(item, ACTION_MARK_ITEM_INCOMPLETE)?;
            Ok(ListAction::MarkItemIncomplete { id })
        }
        ACTION_SET_ITEM_CONTENT => {
            let patch = require_item(item, ACTION_SET_ITEM_CONTENT)?;
            let id = patch_id(&patch, ACTION_SET_ITEM_CONTENT)?;
            let content = patch.content.ok_or(ParseError::MissingField {
                action: ACTION_SET_ITEM_CONTENT,
                field: "content",
            })?;
            Ok(ListAction::SetItemContent { id, content })
        }
        ACTION_SET_ITEM_NOTES => {
            let patch = require_item(item, ACTION_SET_ITEM_NOTES)?;
            let id = patch_id(&patch, ACTION_SET_ITEM_NOTES)?;
            Ok(ListAction::SetItemNotes {
                id,
                notes: patch.notes,
            })
        }
        ACTION_SET_ITEM_ORDER => {
            let patch = require_item(item, ACTION_SET_ITEM_ORDER)?;
            let id = patch_id(&patch, ACTION_SET_ITEM_ORDER)?;
            let order = patch.order.ok_or(ParseError::MissingField {
                action: ACTION_SET_ITEM_ORDER,
                field: "order",
            })?;
            Ok(ListAction::SetItemOrder { id, order })
        }
        _ => Err(ParseError::UnknownAction(action)),
    }
}

fn require_item(item: Option<ItemPatch>, action: &'static str) -> Result<ItemPatch, ParseError> {
    item.ok_or(ParseError::MissingItem { action })
}

fn require_id(item: Option<ItemPatch>, action: &'static str) -> Result<ItemId, ParseError> {
    let patch = require_item(item, action)?;
    patch_id(&patch, action)
}

fn patch_id(patch: &ItemPatch, action: &'static str) -> Result<ItemId, ParseError> {
    patch
        .id
        .clone()
        .map(ItemId)
        .ok_or(ParseError::MissingField { action, field: "id" })
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
