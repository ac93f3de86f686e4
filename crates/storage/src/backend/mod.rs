// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Document persistence backends

mod file;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use file::JsonFileBackend;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeBackend;

use crate::error::StoreError;
use async_trait::async_trait;
use lb_core::Document;

/// Whole-document storage
///
/// `read` on a fresh backend yields an empty document and persists it.
/// `write` replaces the stored document atomically: a reader never observes
/// a partial write.
#[async_trait]
pub trait DocumentBackend: Send + Sync + 'static {
    async fn read(&self) -> Result<Document, StoreError>;
    async fn write(&self, doc: &Document) -> Result<(), StoreError>;
}
