// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Redis-backed credential store
//!
//! Layout mirrors the session contract:
//! - `ws:<token>`: hash of `{purpose, entity_type, entity_id, issued_at}`,
//!   expired after the configured TTL
//! - `<entity_type>:<entity_id>`: set of tokens currently attached to the
//!   entity, maintained by `attach`/`detach`

use super::{CredentialError, CredentialStore};
use async_trait::async_trait;
use chrono::DateTime;
use pantry_core::{
    Credential, EntityKind, EntityRef, IdGen, ListId, Purpose, SessionToken, UuidIdGen,
};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

impl From<redis::RedisError> for CredentialError {
    fn from(err: redis::RedisError) -> Self {
        CredentialError::Backend(err.to_string())
    }
}

/// Credential store over a shared redis connection manager
#[derive(Clone)]
pub struct RedisCredentialStore {
    manager: ConnectionManager,
    ttl: Duration,
    ids: UuidIdGen,
}

impl RedisCredentialStore {
    pub fn new(manager: ConnectionManager, ttl: Duration) -> Self {
        Self {
            manager,
            ttl,
            ids: UuidIdGen,
        }
    }

    fn record_key(token: &SessionToken) -> String {
        format!("ws:{}", token)
    }

    fn entity_key(entity: &EntityRef) -> String {
        format!("{}:{}", entity.kind, entity.id)
    }
}

#[async_trait]
impl CredentialStore for RedisCredentialStore {
    async fn issue(&self, credential: &Credential) -> Result<SessionToken, CredentialError> {
        let token = SessionToken::new(self.ids.next());
        let key = Self::record_key(&token);
        let fields = [
            ("purpose", credential.purpose.as_str().to_string()),
            ("entity_type", credential.entity.kind.as_str().to_string()),
            ("entity_id", credential.entity.id.to_string()),
            ("issued_at", credential.issued_at.to_rfc3339()),
        ];

        let mut conn = self.manager.clone();
        let _: () = redis::pipe()
            .atomic()
            .hset_multiple(&key, &fields)
            .ignore()
            .expire(&key, self.ttl.as_secs() as i64)
            .ignore()
            .query_async(&mut conn)
            .await?;

        debug!(entity = %credential.entity, "issued session credential");
        Ok(token)
    }

    async fn consume(&self, token: &SessionToken) -> Result<Credential, CredentialError> {
        let key = Self::record_key(token);
        let mut conn = self.manager.clone();

        // fetch + delete in one transaction: the credential is single-use
        let (fields, _removed): (HashMap<String, String>, i64) = redis::pipe()
            .atomic()
            .hgetall(&key)
            .del(&key)
            .query_async(&mut conn)
            .await?;

        if fields.is_empty() {
            return Err(CredentialError::InvalidCredential);
        }
        parse_record(&fields)
    }

    async fn attach(
        &self,
        entity: &EntityRef,
        token: &SessionToken,
    ) -> Result<(), CredentialError> {
        let mut conn = self.manager.clone();
        let _: () = conn.sadd(Self::entity_key(entity), token.as_str()).await?;
        Ok(())
    }

    async fn detach(
        &self,
        entity: &EntityRef,
        token: &SessionToken,
    ) -> Result<(), CredentialError> {
        let mut conn = self.manager.clone();
        let _: () = conn.srem(Self::entity_key(entity), token.as_str()).await?;
        Ok(())
    }

    async fn active_tokens(
        &self,
        entity: &EntityRef,
    ) -> Result<Vec<SessionToken>, CredentialError> {
        let mut conn = self.manager.clone();
        let members: Vec<String> = conn.smembers(Self::entity_key(entity)).await?;
        Ok(members.into_iter().map(SessionToken::new).collect())
    }
}

fn parse_record(fields: &HashMap<String, String>) -> Result<Credential, CredentialError> {
    let purpose = fields
        .get("purpose")
        .and_then(|raw| Purpose::parse(raw))
        .ok_or_else(|| CredentialError::Corrupt("bad purpose".to_string()))?;
    let kind = fields
        .get("entity_type")
        .and_then(|raw| EntityKind::parse(raw))
        .ok_or_else(|| CredentialError::Corrupt("bad entity_type".to_string()))?;
    let id = fields
        .get("entity_id")
        .and_then(|raw| raw.parse::<i64>().ok())
        .ok_or_else(|| CredentialError::Corrupt("bad entity_id".to_string()))?;
    let issued_at = fields
        .get("issued_at")
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|stamp| stamp.to_utc())
        .ok_or_else(|| CredentialError::Corrupt("bad issued_at".to_string()))?;

    Ok(Credential {
        purpose,
        entity: EntityRef { kind, id: ListId(id) },
        issued_at,
    })
}
