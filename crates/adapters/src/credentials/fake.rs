// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake credential store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{CredentialError, CredentialStore};
use async_trait::async_trait;
use pantry_core::{Credential, EntityRef, IdGen, SequentialIdGen, SessionToken};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

/// Recorded credential store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialCall {
    Issue { entity: EntityRef },
    Consume { token: String },
    Attach { entity: EntityRef, token: String },
    Detach { entity: EntityRef, token: String },
    ActiveTokens { entity: EntityRef },
}

#[derive(Default)]
struct FakeState {
    records: HashMap<String, Credential>,
    attached: HashMap<EntityRef, BTreeSet<String>>,
    calls: Vec<CredentialCall>,
}

/// In-memory credential store with call recording for testing
#[derive(Clone)]
pub struct FakeCredentialStore {
    state: Arc<Mutex<FakeState>>,
    ids: SequentialIdGen,
}

impl Default for FakeCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCredentialStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState::default())),
            ids: SequentialIdGen::new("token"),
        }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<CredentialCall> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    /// Whether an unconsumed record exists for the token
    pub fn has_record(&self, token: &SessionToken) -> bool {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .records
            .contains_key(token.as_str())
    }

    /// Whether the token is in the entity's active set
    pub fn is_attached(&self, entity: &EntityRef, token: &SessionToken) -> bool {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .attached
            .get(entity)
            .is_some_and(|set| set.contains(token.as_str()))
    }
}

#[async_trait]
impl CredentialStore for FakeCredentialStore {
    async fn issue(&self, credential: &Credential) -> Result<SessionToken, CredentialError> {
        let token = SessionToken::new(self.ids.next());
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(CredentialCall::Issue {
            entity: credential.entity,
        });
        state
            .records
            .insert(token.as_str().to_string(), credential.clone());
        Ok(token)
    }

    async fn consume(&self, token: &SessionToken) -> Result<Credential, CredentialError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(CredentialCall::Consume {
            token: token.as_str().to_string(),
        });
        state
            .records
            .remove(token.as_str())
            .ok_or(CredentialError::InvalidCredential)
    }

    async fn attach(
        &self,
        entity: &EntityRef,
        token: &SessionToken,
    ) -> Result<(), CredentialError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(CredentialCall::Attach {
            entity: *entity,
            token: token.as_str().to_string(),
        });
        state
            .attached
            .entry(*entity)
            .or_default()
            .insert(token.as_str().to_string());
        Ok(())
    }

    async fn detach(
        &self,
        entity: &EntityRef,
        token: &SessionToken,
    ) -> Result<(), CredentialError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(CredentialCall::Detach {
            entity: *entity,
            token: token.as_str().to_string(),
        });
        if let Some(set) = state.attached.get_mut(entity) {
            set.remove(token.as_str());
        }
        Ok(())
    }

    async fn active_tokens(
        &self,
        entity: &EntityRef,
    ) -> Result<Vec<SessionToken>, CredentialError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(CredentialCall::ActiveTokens { entity: *entity });
        Ok(state
            .attached
            .get(entity)
            .map(|set| set.iter().cloned().map(SessionToken::new).collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
