// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Row types persisted in the document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category assigned to todos that arrive without one
pub const DEFAULT_CATEGORY: &str = "未分类";
/// Priority assigned to todos that arrive without one
pub const DEFAULT_PRIORITY: u8 = 2;
pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 3;
/// Maximum number of tags kept on a todo
pub const MAX_TAGS: usize = 10;
/// Maximum length of a single tag, in characters
pub const MAX_TAG_CHARS: usize = 24;

/// Identity record. The store only ever holds the single owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Opaque bearer credential issued by a successful sign-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    pub user_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// A token is usable strictly before its expiry
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Current passcode, stored as a salted SHA-256 digest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub passcode_hash: String,
    pub salt: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    Completed,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub status: TodoStatus,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_priority() -> u8 {
    DEFAULT_PRIORITY
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Active,
    Ended,
}

/// A timed focus session. At most one per user may be active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusSession {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub state: SessionState,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub elapsed_seconds: u64,
    #[serde(default)]
    pub total_tasks: u32,
    #[serde(default)]
    pub completed_tasks: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FocusSession {
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }
}

/// A todo joined to a focus session, with the title captured at join time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTaskRef {
    pub id: String,
    pub user_id: String,
    pub session_id: String,
    pub todo_id: String,
    pub title_snapshot: String,
    pub order_index: u32,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
