// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process connection registry
//!
//! Maps a session token to the sender half of its connection's outbound
//! channel. The credential store's per-entity token set is the cross-process
//! membership list; this registry resolves which of those tokens terminate
//! in this process.

use dashmap::DashMap;
use pantry_core::{SessionToken, Snapshot};
use tokio::sync::mpsc;

/// Sender half of a connection's outbound snapshot channel
pub type SnapshotSender = mpsc::UnboundedSender<Snapshot>;

/// Token -> local connection handle
#[derive(Default)]
pub struct Registry {
    senders: DashMap<SessionToken, SnapshotSender>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, token: SessionToken, sender: SnapshotSender) {
        self.senders.insert(token, sender);
    }

    pub fn unregister(&self, token: &SessionToken) {
        self.senders.remove(token);
    }

    pub fn is_registered(&self, token: &SessionToken) -> bool {
        self.senders.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    /// Deliver a snapshot to one local connection.
    ///
    /// Returns false when the token has no live handle here, either because
    /// it terminates in another process or its receiver is gone.
    pub fn send(&self, token: &SessionToken, snapshot: Snapshot) -> bool {
        match self.senders.get(token) {
            Some(sender) => sender.send(snapshot).is_ok(),
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
