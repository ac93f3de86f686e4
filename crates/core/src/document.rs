// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The persisted document: the single unit of durability

use crate::model::{AccessToken, AuthConfig, FocusSession, SessionTaskRef, Todo, User};
use serde::{Deserialize, Serialize};

/// Whole-store state, written and read as one JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub version: u32,
    pub users: Vec<User>,
    pub tokens: Vec<AccessToken>,
    pub auth: Option<AuthConfig>,
    pub todos: Vec<Todo>,
    pub focus_sessions: Vec<FocusSession>,
    pub session_task_refs: Vec<SessionTaskRef>,
}

impl Document {
    /// Current version of the document format
    ///
    /// Documents tagged with any other version are loaded best-effort; there
    /// is no upgrade path.
    pub const CURRENT_VERSION: u32 = 1;

    pub fn empty() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            users: Vec::new(),
            tokens: Vec::new(),
            auth: None,
            todos: Vec::new(),
            focus_sessions: Vec::new(),
            session_task_refs: Vec::new(),
        }
    }

    /// The single owner account, if anyone has signed in yet
    pub fn owner(&self) -> Option<&User> {
        self.users.first()
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}
