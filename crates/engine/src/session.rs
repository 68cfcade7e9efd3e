// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session engine: handshake, dispatch, and fan-out
//!
//! Mutation pipeline per inbound action: acquire the list's lock, load the
//! current items, apply the pure ordering engine, persist the batch, queue
//! the snapshot to every attached connection, release the lock. Failures
//! degrade to "no observable change": a persistence failure answers only the
//! sender with the unchanged state, and a malformed message is logged and
//! dropped.

use crate::error::{ConnectError, EngineError, IssueError};
use crate::registry::{Registry, SnapshotSender};
use pantry_adapters::{CredentialError, CredentialStore, ItemStore, ListLock};
use pantry_core::{
    ordering, parse_message, Clock, CloseReason, Connection, Credential, EntityKind, EntityRef,
    IdGen, ListAction, ListId, Purpose, SessionToken, Snapshot,
};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Engine policy knobs
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Purpose this endpoint's credentials must carry
    pub purpose: Purpose,
    /// Entity kind this endpoint serves
    pub entity_kind: EntityKind,
    /// Close connections with no inbound frame for this long
    pub idle_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            purpose: Purpose::ModifyList,
            entity_kind: EntityKind::ShoppingList,
            idle_timeout: Duration::from_secs(90),
        }
    }
}

/// Engine adapter dependencies
pub struct EngineDeps<C, S, L> {
    pub credentials: C,
    pub items: S,
    pub locks: L,
}

/// One authenticated, open connection
#[derive(Debug)]
pub struct ListSession {
    token: SessionToken,
    entity: EntityRef,
    pub connection: Connection,
}

impl ListSession {
    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn entity(&self) -> &EntityRef {
        &self.entity
    }

    pub fn list_id(&self) -> ListId {
        self.entity.id
    }

    /// Record an inbound frame (any frame counts, including keepalives)
    pub fn record_activity(&mut self, now: Instant) {
        self.connection.record_activity(now);
    }
}

/// The collaborative list session engine
pub struct SessionEngine<C, S, L, K, I> {
    credentials: C,
    items: S,
    locks: L,
    clock: K,
    ids: I,
    registry: Registry,
    config: EngineConfig,
}

impl<C, S, L, K, I> SessionEngine<C, S, L, K, I>
where
    C: CredentialStore,
    S: ItemStore,
    L: ListLock,
    K: Clock,
    I: IdGen,
{
    pub fn new(deps: EngineDeps<C, S, L>, clock: K, ids: I, config: EngineConfig) -> Self {
        Self {
            credentials: deps.credentials,
            items: deps.items,
            locks: deps.locks,
            clock,
            ids,
            registry: Registry::new(),
            config,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.config.idle_timeout
    }

    /// Current monotonic time, for connection activity stamps
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Mint a session credential for a list
    ///
    /// Authorization of the caller is the upstream gateway's concern; this
    /// only refuses lists that do not exist.
    pub async fn issue_session(&self, list_id: ListId) -> Result<SessionToken, IssueError> {
        if !self.items.list_exists(list_id).await? {
            return Err(IssueError::UnknownList(list_id));
        }

        let credential = Credential {
            purpose: self.config.purpose,
            entity: EntityRef {
                kind: self.config.entity_kind,
                id: list_id,
            },
            issued_at: self.clock.now_utc(),
        };
        let token = self.credentials.issue(&credential).await?;
        info!(list = %list_id, "issued session credential");
        Ok(token)
    }

    /// Validate and consume a handshake credential
    ///
    /// Credentials are single-use: success or failure, the record is gone
    /// afterwards. A mismatched purpose or entity kind is rejected the same
    /// way as an unknown token.
    pub async fn authorize(&self, token: &SessionToken) -> Result<Credential, ConnectError> {
        let credential = self.credentials.consume(token).await.map_err(|err| match err {
            CredentialError::InvalidCredential | CredentialError::Corrupt(_) => {
                ConnectError::Rejected
            }
            other => ConnectError::Credentials(other),
        })?;

        if !credential.authorizes(self.config.purpose, self.config.entity_kind) {
            warn!(entity = %credential.entity, "credential bound to a different endpoint");
            return Err(ConnectError::Rejected);
        }
        Ok(credential)
    }

    /// Attach an authorized connection and send it the initial state
    pub async fn open(
        &self,
        token: SessionToken,
        credential: &Credential,
        sender: SnapshotSender,
    ) -> Result<ListSession, EngineError> {
        let entity = credential.entity;
        self.credentials.attach(&entity, &token).await?;
        self.registry.register(token.clone(), sender);

        let mut connection = Connection::new(self.config.idle_timeout);
        connection.open(&self.clock);
        let session = ListSession {
            token,
            entity,
            connection,
        };

        info!(list = %session.list_id(), session = %session.token, "session opened");
        // every participant learns the current state the same way: a
        // broadcast answering the implicit current_items
        self.process_action(&session, ListAction::CurrentItems).await;
        Ok(session)
    }

    /// Handle one inbound text frame
    ///
    /// Malformed payloads and unknown actions are dropped without closing
    /// the connection and without any broadcast.
    pub async fn handle_text(&self, session: &ListSession, text: &str) {
        let action = match parse_message(text) {
            Ok(action) => action,
            Err(err) => {
                warn!(list = %session.list_id(), %err, "dropping malformed message");
                return;
            }
        };

        match action {
            ListAction::Ping => {
                // keepalive: answer only the sender, no lock, no snapshot
                self.registry.send(&session.token, Snapshot::ping_ack());
            }
            action => self.process_action(session, action).await,
        }
    }

    /// Run one action through the serialized mutation pipeline
    async fn process_action(&self, session: &ListSession, action: ListAction) {
        let list_id = session.list_id();
        debug!(list = %list_id, action = action.name(), "dispatching");

        let guard = match self.locks.acquire(list_id).await {
            Ok(guard) => guard,
            Err(err) => {
                error!(list = %list_id, %err, "failed to acquire list lock");
                return;
            }
        };

        let current = match self.items.load_all(list_id).await {
            Ok(items) => items,
            Err(err) => {
                error!(list = %list_id, %err, "failed to load items");
                self.release(list_id, guard).await;
                return;
            }
        };

        let applied = ordering::apply(list_id, &current, &action, &self.ids);
        let persisted = if applied.batch.is_empty() {
            Ok(())
        } else {
            self.items.apply_batch(list_id, &applied.batch).await
        };

        match persisted {
            Ok(()) => {
                // fan out before releasing the lock: every attachee sees the
                // same snapshot sequence, in the same order, because no later
                // mutation for this list can start until delivery is queued
                let snapshot = Snapshot::new(action.name(), applied.items);
                self.publish(&session.entity, snapshot).await;
                self.release(list_id, guard).await;
            }
            Err(err) => {
                // the batch is atomic, so stored state is unchanged; answer
                // the sender with that state instead of an error
                self.release(list_id, guard).await;
                error!(list = %list_id, %err, "failed to persist item batch");
                let snapshot = Snapshot::new(action.name(), ordering::canonicalize(&current));
                self.registry.send(&session.token, snapshot);
            }
        }
    }

    /// Deliver a snapshot to every connection attached to the entity
    async fn publish(&self, entity: &EntityRef, snapshot: Snapshot) {
        let tokens = match self.credentials.active_tokens(entity).await {
            Ok(tokens) => tokens,
            Err(err) => {
                error!(entity = %entity, %err, "failed to resolve attached sessions");
                return;
            }
        };

        for token in tokens {
            if !self.registry.send(&token, snapshot.clone()) {
                // the session may terminate in another process; leave its
                // membership to that process's detach
                debug!(entity = %entity, session = %token, "no local handle for session");
            }
        }
    }

    /// Detach a closing connection
    pub async fn close(&self, session: &mut ListSession, reason: CloseReason) {
        session.connection.close(reason.clone());
        self.registry.unregister(&session.token);
        if let Err(err) = self.credentials.detach(&session.entity, &session.token).await {
            warn!(session = %session.token, %err, "failed to detach session");
        }
        info!(list = %session.list_id(), session = %session.token, ?reason, "session closed");
    }

    async fn release(&self, list_id: ListId, guard: L::Guard) {
        if let Err(err) = self.locks.release(guard).await {
            error!(list = %list_id, %err, "failed to release list lock");
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
