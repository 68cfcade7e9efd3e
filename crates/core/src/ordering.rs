// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure ordering engine for collaborative lists
//!
//! `apply` computes the next item set for a list given one action. No I/O:
//! callers load the current items, apply, then persist the returned batch
//! under the list's mutation lock.
//!
//! Invariant maintained after every mutation: within each partition (the
//! items sharing a `completed` value) the `order` values are exactly
//! `1..=len`, no gaps, no duplicates. Items enter a partition at its end;
//! the partition they leave is compacted.
//!
//! Actions that reference an item id not present in the list are silent
//! no-ops returning the unchanged state. Two collaborators racing a delete
//! against an edit is the normal case, not an error.

use crate::id::IdGen;
use crate::item::{Item, ItemId, ListId};
use crate::protocol::ListAction;

/// Result of applying an action
#[derive(Debug, Clone)]
pub struct Applied {
    /// Full item set in canonical output ordering: incomplete items by
    /// ascending order, then completed items by ascending order.
    pub items: Vec<Item>,
    /// Minimal persistence batch to move stored state to `items`
    pub batch: Batch,
}

/// Atomic persistence batch: all writes succeed or none do
#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub upserts: Vec<Item>,
    pub deletes: Vec<ItemId>,
}

impl Batch {
    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.deletes.is_empty()
    }
}

/// Sort the item set into canonical output ordering without mutating it
pub fn canonicalize(items: &[Item]) -> Vec<Item> {
    let (open, done) = split(items);
    let mut out = open;
    out.extend(done);
    out
}

/// Apply one action to the current item set
pub fn apply(list_id: ListId, current: &[Item], action: &ListAction, ids: &impl IdGen) -> Applied {
    let (mut open, mut done) = split(current);

    match action {
        ListAction::CurrentItems | ListAction::Ping => {}

        ListAction::AddItem {
            content,
            notes,
            completed,
        } => {
            let item = Item {
                id: ItemId::new(ids.next()),
                list_id,
                content: content.clone(),
                notes: notes.clone(),
                completed: *completed,
                // placeholder, renumbering assigns the real position
                order: 0,
            };
            partition_mut(&mut open, &mut done, *completed).push(item);
        }

        ListAction::DeleteItem { id } => {
            open.retain(|item| &item.id != id);
            done.retain(|item| &item.id != id);
        }

        ListAction::MarkItemComplete { id } => {
            if let Some(pos) = position(&open, id) {
                let mut item = open.remove(pos);
                item.completed = true;
                done.push(item);
            }
        }

        ListAction::MarkItemIncomplete { id } => {
            if let Some(pos) = position(&done, id) {
                let mut item = done.remove(pos);
                item.completed = false;
                open.push(item);
            }
        }

        ListAction::SetItemContent { id, content } => {
            if let Some(item) = find_mut(&mut open, &mut done, id) {
                item.content = content.clone();
            }
        }

        ListAction::SetItemNotes { id, notes } => {
            if let Some(item) = find_mut(&mut open, &mut done, id) {
                item.notes = notes.clone();
            }
        }

        ListAction::SetItemOrder { id, order } => {
            // The partition is the one the item currently occupies; the
            // requested order clamps to [1, partition length].
            for partition in [&mut open, &mut done] {
                if let Some(pos) = position(partition, id) {
                    let len = partition.len() as i32;
                    let clamped = (*order).clamp(1, len);
                    let item = partition.remove(pos);
                    partition.insert((clamped - 1) as usize, item);
                    break;
                }
            }
        }

        ListAction::ClearItems => {
            open.clear();
            done.clear();
        }
    }

    renumber(&mut open);
    renumber(&mut done);

    let mut items = open;
    items.extend(done);
    let batch = diff(current, &items);
    Applied { items, batch }
}

/// Split into (incomplete, completed), each sorted by stored order.
/// Item id breaks ties so a corrupted store still yields a stable ordering.
fn split(items: &[Item]) -> (Vec<Item>, Vec<Item>) {
    let mut open: Vec<Item> = items.iter().filter(|i| !i.completed).cloned().collect();
    let mut done: Vec<Item> = items.iter().filter(|i| i.completed).cloned().collect();
    let by_order = |a: &Item, b: &Item| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id));
    open.sort_by(by_order);
    done.sort_by(by_order);
    (open, done)
}

fn partition_mut<'a>(
    open: &'a mut Vec<Item>,
    done: &'a mut Vec<Item>,
    completed: bool,
) -> &'a mut Vec<Item> {
    if completed {
        done
    } else {
        open
    }
}

fn position(partition: &[Item], id: &ItemId) -> Option<usize> {
    partition.iter().position(|item| &item.id == id)
}

fn find_mut<'a>(
    open: &'a mut [Item],
    done: &'a mut [Item],
    id: &ItemId,
) -> Option<&'a mut Item> {
    open.iter_mut()
        .chain(done.iter_mut())
        .find(|item| &item.id == id)
}

fn renumber(partition: &mut [Item]) {
    for (index, item) in partition.iter_mut().enumerate() {
        item.order = index as i32 + 1;
    }
}

/// Minimal batch transforming the stored set into the new set
fn diff(current: &[Item], new_items: &[Item]) -> Batch {
    let mut batch = Batch::default();

    for item in new_items {
        match current.iter().find(|c| c.id == item.id) {
            Some(existing) if existing == item => {}
            _ => batch.upserts.push(item.clone()),
        }
    }

    for existing in current {
        if !new_items.iter().any(|item| item.id == existing.id) {
            batch.deletes.push(existing.id.clone());
        }
    }

    batch
}

#[cfg(test)]
#[path = "ordering_tests.rs"]
mod tests;
