// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! lb-storage: persistence, serialization and the client facade
//!
//! A [`Store`] owns one backing document and runs every operation against
//! it in arrival order. A [`Client`] wraps a store with a bearer token and
//! exposes the `rest` / `auth` / `rpc` surface.

pub mod auth;
pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod hydrate;
pub mod mutation;
pub mod response;
pub mod store;
pub mod traced;

pub use auth::{AuthError, AuthSession};
pub use backend::{DocumentBackend, JsonFileBackend};
pub use client::{AuthClient, Client, FileClient, Method, RestRequest};
pub use config::StoreConfig;
pub use error::StoreError;
pub use mutation::MutationError;
pub use response::{ApiError, ApiResponse, ErrorCode};
pub use store::{Cycle, FileStore, Store};
pub use traced::TracedBackend;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use backend::FakeBackend;
