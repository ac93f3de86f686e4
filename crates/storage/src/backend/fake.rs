// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory backend for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::DocumentBackend;
use crate::error::StoreError;
use async_trait::async_trait;
use lb_core::Document;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct FakeBackend {
    doc: Arc<Mutex<Option<Document>>>,
    fail_writes: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document
    pub fn with_document(doc: Document) -> Self {
        let backend = Self::default();
        *backend.doc.lock().unwrap_or_else(|e| e.into_inner()) = Some(doc);
        backend
    }

    /// The stored document, if anything has been written
    pub fn document(&self) -> Option<Document> {
        self.doc.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Make the next `count` writes fail with an I/O error
    pub fn fail_next_writes(&self, count: usize) {
        self.fail_writes.store(count, Ordering::SeqCst);
    }

    /// Number of successful writes
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentBackend for FakeBackend {
    async fn read(&self) -> Result<Document, StoreError> {
        let mut guard = self.doc.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.get_or_insert_with(Document::empty).clone())
    }

    async fn write(&self, doc: &Document) -> Result<(), StoreError> {
        let pending = self
            .fail_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if pending.is_ok() {
            return Err(io::Error::other("injected write failure").into());
        }
        *self.doc.lock().unwrap_or_else(|e| e.into_inner()) = Some(doc.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
