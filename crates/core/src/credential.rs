// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session credential claims
//!
//! A credential is an opaque token bound to one purpose and one target
//! entity. It authorizes exactly one connection handshake; the store that
//! persists it treats it as single-use.

use crate::item::ListId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque session token handed to the client at issuance
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionToken(pub String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a credential authorizes its holder to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Purpose {
    /// Open a modification session against a shopping list
    #[serde(rename = "shopping-list/modify")]
    ModifyList,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::ModifyList => "shopping-list/modify",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "shopping-list/modify" => Some(Purpose::ModifyList),
            _ => None,
        }
    }
}

impl std::fmt::Display for Purpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of entity a session attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "shopping_list")]
    ShoppingList,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::ShoppingList => "shopping_list",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "shopping_list" => Some(EntityKind::ShoppingList),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The entity a credential targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: ListId,
}

impl EntityRef {
    pub fn shopping_list(id: ListId) -> Self {
        Self {
            kind: EntityKind::ShoppingList,
            id,
        }
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Claims stored against a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub purpose: Purpose,
    pub entity: EntityRef,
    pub issued_at: DateTime<Utc>,
}

impl Credential {
    /// Check the claims against what a connection endpoint expects
    pub fn authorizes(&self, purpose: Purpose, kind: EntityKind) -> bool {
        self.purpose == purpose && self.entity.kind == kind
    }
}
