// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced backend wrapper for consistent observability

use crate::backend::DocumentBackend;
use crate::error::StoreError;
use async_trait::async_trait;
use lb_core::Document;
use tracing::Instrument;

/// Wrapper that adds tracing to any DocumentBackend
#[derive(Clone)]
pub struct TracedBackend<B> {
    inner: B,
}

impl<B> TracedBackend<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

#[async_trait]
impl<B: DocumentBackend> DocumentBackend for TracedBackend<B> {
    async fn read(&self) -> Result<Document, StoreError> {
        async {
            let start = std::time::Instant::now();
            let result = self.inner.read().await;
            let elapsed = start.elapsed();

            match &result {
                Ok(doc) => tracing::debug!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    todos = doc.todos.len(),
                    focus_sessions = doc.focus_sessions.len(),
                    session_task_refs = doc.session_task_refs.len(),
                    "document loaded"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "read failed"
                ),
            }

            result
        }
        .instrument(tracing::info_span!("document.read"))
        .await
    }

    async fn write(&self, doc: &Document) -> Result<(), StoreError> {
        async {
            let start = std::time::Instant::now();
            let result = self.inner.write(doc).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => {
                    tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "document persisted")
                }
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "write failed"
                ),
            }

            result
        }
        .instrument(tracing::info_span!("document.write"))
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
