// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation serializer
//!
//! Every read-compute-write cycle against the backing document runs under
//! one FIFO lock owned by the [`Store`]. Two stores never share a queue,
//! even when they point at the same file.

use crate::auth::{self, AuthSettings};
use crate::backend::{DocumentBackend, JsonFileBackend};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::traced::TracedBackend;
use lb_core::{Clock, Document, IdGen, SystemClock, UuidIdGen};
use tokio::sync::Mutex;

/// Outcome of an exclusive task: whether the document must be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cycle<T> {
    /// Nothing changed; skip the write-back
    Read(T),
    /// The document was modified and must be written before returning
    Write(T),
}

impl<T> Cycle<T> {
    pub fn into_inner(self) -> T {
        match self {
            Cycle::Read(value) | Cycle::Write(value) => value,
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(self, Cycle::Write(_))
    }
}

/// Store backed by a JSON file with traced I/O
pub type FileStore = Store<TracedBackend<JsonFileBackend>, SystemClock, UuidIdGen>;

pub struct Store<B, C: Clock = SystemClock, I: IdGen = UuidIdGen> {
    backend: B,
    queue: Mutex<()>,
    config: StoreConfig,
    clock: C,
    ids: I,
}

impl FileStore {
    /// Open the file named by `config.path`. No I/O happens until the first
    /// operation.
    pub fn open(config: StoreConfig) -> Self {
        let backend = TracedBackend::new(JsonFileBackend::new(config.path.clone()));
        Store::new(backend, config, SystemClock, UuidIdGen)
    }
}

impl<B, C, I> Store<B, C, I>
where
    B: DocumentBackend,
    C: Clock,
    I: IdGen,
{
    pub fn new(backend: B, config: StoreConfig, clock: C, ids: I) -> Self {
        Self {
            backend,
            queue: Mutex::new(()),
            config,
            clock,
            ids,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn ids(&self) -> &I {
        &self.ids
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn auth_settings(&self) -> AuthSettings<'_> {
        AuthSettings {
            default_passcode: &self.config.default_passcode,
            token_ttl: self.config.token_ttl,
            owner_email: &self.config.owner_email,
        }
    }

    /// Run `task` against the current document once every earlier task has
    /// finished. A [`Cycle::Write`] result is persisted before returning; if
    /// that write fails the error propagates and the stored document is
    /// left at the last successful write. Later tasks run regardless.
    pub async fn run_exclusive<T, F>(&self, task: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Document) -> Cycle<T> + Send,
        T: Send,
    {
        let _turn = self.queue.lock().await;
        let mut doc = self.backend.read().await?;
        match task(&mut doc) {
            Cycle::Read(value) => Ok(value),
            Cycle::Write(value) => {
                self.backend.write(&doc).await?;
                Ok(value)
            }
        }
    }

    /// A consistent copy of the current document
    pub async fn snapshot(&self) -> Result<Document, StoreError> {
        self.run_exclusive(|doc| Cycle::Read(doc.clone())).await
    }

    /// Remove expired tokens, returning how many were dropped
    pub async fn purge_expired_tokens(&self) -> Result<usize, StoreError> {
        let now = self.clock.now();
        let removed = self
            .run_exclusive(|doc| match auth::purge_expired(doc, now) {
                0 => Cycle::Read(0),
                n => Cycle::Write(n),
            })
            .await?;
        if removed > 0 {
            tracing::info!(removed, "purged expired tokens");
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
