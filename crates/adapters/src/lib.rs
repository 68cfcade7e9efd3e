// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for external I/O: the session credential store, the item
//! repository, and the per-list mutation lock.
//!
//! Each adapter is a trait with a production implementation (redis or
//! Postgres) and a fake for tests, gated behind the `test-support` feature.

pub mod credentials;
pub mod items;
pub mod locks;

pub use credentials::{CredentialError, CredentialStore, RedisCredentialStore};
pub use items::{ItemStore, ItemStoreError, PgItemStore};
pub use locks::{ListLock, LocalListLock, LockError, PgAdvisoryLock};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use credentials::{CredentialCall, FakeCredentialStore};
#[cfg(any(test, feature = "test-support"))]
pub use items::{FakeItemStore, ItemCall};
