// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! lb-core: data model and query engine for the localbase store
//!
//! This crate provides:
//! - Row types and the persisted [`Document`]
//! - Per-table codecs ([`TableRow`]) with field normalization and
//!   unique-constraint hooks
//! - The filter/order/projection query engine
//! - Clock and ID abstractions

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod clock;
pub mod document;
pub mod id;
pub mod model;
pub mod query;
pub mod table;

pub use clock::{Clock, FakeClock, SystemClock};
pub use document::Document;
pub use id::{opaque_token, IdGen, SequentialIdGen, UuidIdGen};
pub use model::{
    AccessToken, AuthConfig, FocusSession, SessionState, SessionTaskRef, Todo, TodoStatus, User,
};
pub use query::{QueryError, QueryParams, QuerySpec};
pub use table::{RowError, Table, TableRow, UnknownTable, WriteMode};
