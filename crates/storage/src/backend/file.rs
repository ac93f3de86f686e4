// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file backend

use super::DocumentBackend;
use crate::error::StoreError;
use crate::hydrate::hydrate;
use async_trait::async_trait;
use lb_core::{Clock, Document, SystemClock};
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Stores the document as pretty-printed JSON at a single path
#[derive(Clone)]
pub struct JsonFileBackend<C: Clock = SystemClock> {
    path: PathBuf,
    clock: C,
}

impl JsonFileBackend<SystemClock> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, SystemClock)
    }
}

impl<C: Clock> JsonFileBackend<C> {
    pub fn with_clock(path: impl Into<PathBuf>, clock: C) -> Self {
        Self {
            path: path.into(),
            clock,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent(&self) -> io::Result<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                tokio::fs::create_dir_all(parent).await
            }
            _ => Ok(()),
        }
    }

    /// Sibling temp path, unique per write
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "db.json".to_string());
        let temp = format!(".{}.{}.tmp", name, uuid::Uuid::new_v4().simple());
        self.path.with_file_name(temp)
    }
}

#[async_trait]
impl<C: Clock> DocumentBackend for JsonFileBackend<C> {
    async fn read(&self) -> Result<Document, StoreError> {
        self.ensure_parent().await?;
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "initializing empty document");
                let doc = Document::empty();
                self.write(&doc).await?;
                return Ok(doc);
            }
            Err(e) => return Err(e.into()),
        };
        let raw: serde_json::Value = serde_json::from_slice(&bytes)?;
        Ok(hydrate(raw, self.clock.now()))
    }

    async fn write(&self, doc: &Document) -> Result<(), StoreError> {
        self.ensure_parent().await?;
        let bytes = serde_json::to_vec_pretty(doc)?;

        let temp_path = self.temp_path();
        let result = async {
            let mut file = tokio::fs::File::create(&temp_path).await?;
            file.write_all(&bytes).await?;
            file.sync_all().await?;
            drop(file);
            // Atomic replace (rename is atomic on POSIX)
            tokio::fs::rename(&temp_path, &self.path).await
        }
        .await;

        if let Err(e) = result {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
