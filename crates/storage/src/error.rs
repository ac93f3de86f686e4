// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fatal store errors
//!
//! These abort the in-flight operation. Expected, caller-branchable
//! failures travel inside [`crate::ApiResponse`] instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config {key}: {message}")]
    InvalidConfig { key: &'static str, message: String },
}
