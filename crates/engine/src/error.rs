// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the session engine

use pantry_adapters::{CredentialError, ItemStoreError, LockError};
use pantry_core::ListId;
use thiserror::Error;

/// Errors from credential issuance
#[derive(Debug, Error)]
pub enum IssueError {
    #[error("shopping list not found: {0}")]
    UnknownList(ListId),
    #[error("credential store error: {0}")]
    Credentials(#[from] CredentialError),
    #[error("item store error: {0}")]
    Items(#[from] ItemStoreError),
}

/// Errors from the connection handshake
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The credential is missing, unknown, already used, or bound to a
    /// different purpose or entity than this endpoint serves
    #[error("invalid or expired session credential")]
    Rejected,
    #[error("credential store error: {0}")]
    Credentials(CredentialError),
}

/// Internal engine failures surfaced to the connection loop
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("credential store error: {0}")]
    Credentials(#[from] CredentialError),
    #[error("item store error: {0}")]
    Items(#[from] ItemStoreError),
    #[error("lock error: {0}")]
    Lock(#[from] LockError),
}
