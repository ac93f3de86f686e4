// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Row, owner and token identifiers

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Source of primary keys for inserted rows and the owner account.
///
/// Ids are assigned by the store; any `id` a caller supplies is replaced.
pub trait IdGen: Clone + Send + Sync + 'static {
    fn next(&self) -> String;
}

/// Hyphenated v4 UUIDs, as persisted in `db.json`
#[derive(Clone, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// `<prefix>-<n>` ids for deterministic assertions.
///
/// Clones share one counter, so a store and its tests see the same sequence.
#[derive(Clone)]
pub struct SequentialIdGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}-{n}", self.prefix)
    }
}

/// Mint an opaque bearer token: two simple v4 UUIDs, 64 hex chars
pub fn opaque_token() -> String {
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}
