// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Pantry collaborative session engine
//!
//! Owns the connection lifecycle and the mutation pipeline: authorize the
//! handshake against the credential store, then for every inbound action
//! acquire the list's mutation lock, load the items, run the pure ordering
//! engine, persist the batch, and fan the resulting snapshot out to every
//! connection attached to the same list.

mod error;
mod registry;
mod session;

pub use error::{ConnectError, EngineError, IssueError};
pub use registry::Registry;
pub use session::{EngineConfig, EngineDeps, ListSession, SessionEngine};
