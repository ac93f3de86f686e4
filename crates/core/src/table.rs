// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-table row codecs
//!
//! Each entity table is a [`Table`] variant backed by a [`TableRow`] type.
//! The trait carries everything the mutation engine needs to know about a
//! table: where its rows live in the [`Document`], how caller-supplied
//! fields are normalized, and which rows may not coexist.

use crate::document::Document;
use crate::model::{
    FocusSession, SessionState, SessionTaskRef, Todo, TodoStatus, DEFAULT_CATEGORY,
    DEFAULT_PRIORITY, MAX_PRIORITY, MAX_TAGS, MAX_TAG_CHARS, MIN_PRIORITY,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The entity tables addressable through `rest`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Todos,
    FocusSessions,
    SessionTaskRefs,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::Todos, Table::FocusSessions, Table::SessionTaskRefs];

    /// Table name as used in requests and as the document key
    pub fn name(&self) -> &'static str {
        match self {
            Table::Todos => "todos",
            Table::FocusSessions => "focus_sessions",
            Table::SessionTaskRefs => "session_task_refs",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown table: {0}")]
pub struct UnknownTable(pub String);

impl FromStr for Table {
    type Err = UnknownTable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| UnknownTable(s.to_string()))
    }
}

/// A caller-supplied row or patch that cannot be stored
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {table} row: {reason}")]
pub struct RowError {
    pub table: Table,
    pub reason: String,
}

impl RowError {
    pub fn new(table: Table, reason: impl Into<String>) -> Self {
        Self {
            table,
            reason: reason.into(),
        }
    }
}

/// Whether fields are being normalized for a new row or for a patch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Insert,
    Update,
}

/// Codec for one table's rows
pub trait TableRow: Serialize + DeserializeOwned + Clone + Send + 'static {
    const TABLE: Table;

    /// Columns stripped from every update patch
    const IMMUTABLE: &'static [&'static str] = &["id", "user_id", "created_at"];

    fn id(&self) -> &str;
    fn owner_id(&self) -> &str;
    fn rows(doc: &Document) -> &Vec<Self>;
    fn rows_mut(doc: &mut Document) -> &mut Vec<Self>;

    /// Clamp and default the caller-supplied fields in place.
    ///
    /// In [`WriteMode::Update`] only fields present in `fields` are touched.
    fn normalize(_fields: &mut Map<String, Value>, _mode: WriteMode) -> Result<(), RowError> {
        Ok(())
    }

    /// Fill defaults that depend on existing rows or the current time
    fn prepare_insert(_fields: &mut Map<String, Value>, _existing: &[Self], _now: DateTime<Utc>) {}

    /// Derive dependent columns after a patch has been merged
    fn after_update(&mut self, _before: &Self, _now: DateTime<Utc>) {}

    /// Unique-constraint emulation: describe why `self` may not coexist with
    /// `other`, or `None` when it may.
    fn unique_conflict(&self, _other: &Self) -> Option<String> {
        None
    }
}

impl TableRow for Todo {
    const TABLE: Table = Table::Todos;

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.user_id
    }

    fn rows(doc: &Document) -> &Vec<Self> {
        &doc.todos
    }

    fn rows_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.todos
    }

    fn normalize(fields: &mut Map<String, Value>, mode: WriteMode) -> Result<(), RowError> {
        if mode == WriteMode::Insert || fields.contains_key("priority") {
            let priority = fields.get("priority").map_or(DEFAULT_PRIORITY, clamp_priority);
            fields.insert("priority".into(), Value::from(priority));
        }

        if mode == WriteMode::Insert || fields.contains_key("category") {
            let category = match fields.get("category") {
                Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
                Some(Value::String(_)) | Some(Value::Null) | None => DEFAULT_CATEGORY.to_string(),
                Some(_) => return Err(RowError::new(Table::Todos, "category must be a string")),
            };
            fields.insert("category".into(), Value::String(category));
        }

        if let Some(tags) = fields.get("tags") {
            let tags = normalize_tags(tags)
                .ok_or_else(|| RowError::new(Table::Todos, "tags must be a list of strings"))?;
            fields.insert("tags".into(), Value::from(tags));
        }

        Ok(())
    }

    fn prepare_insert(fields: &mut Map<String, Value>, _existing: &[Self], now: DateTime<Utc>) {
        let completed = fields.get("status").and_then(Value::as_str) == Some("completed");
        let stamped = matches!(fields.get("completed_at"), Some(v) if !v.is_null());
        if completed && !stamped {
            fields.insert("completed_at".into(), timestamp(now));
        }
    }

    fn after_update(&mut self, before: &Self, now: DateTime<Utc>) {
        match self.status {
            TodoStatus::Completed if before.status != TodoStatus::Completed => {
                self.completed_at.get_or_insert(now);
            }
            TodoStatus::Completed => {}
            TodoStatus::Pending | TodoStatus::Archived => self.completed_at = None,
        }
    }
}

impl TableRow for FocusSession {
    const TABLE: Table = Table::FocusSessions;

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.user_id
    }

    fn rows(doc: &Document) -> &Vec<Self> {
        &doc.focus_sessions
    }

    fn rows_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.focus_sessions
    }

    fn normalize(fields: &mut Map<String, Value>, mode: WriteMode) -> Result<(), RowError> {
        // Anything other than an explicit "ended" starts a live session
        if mode == WriteMode::Insert {
            let state = match fields.get("state").and_then(Value::as_str) {
                Some("ended") => "ended",
                _ => "active",
            };
            fields.insert("state".into(), Value::from(state));
        }
        Ok(())
    }

    fn prepare_insert(fields: &mut Map<String, Value>, _existing: &[Self], now: DateTime<Utc>) {
        if matches!(fields.get("started_at"), None | Some(Value::Null)) {
            fields.insert("started_at".into(), timestamp(now));
        }
    }

    fn after_update(&mut self, before: &Self, now: DateTime<Utc>) {
        if before.is_active() && self.state == SessionState::Ended {
            self.ended_at.get_or_insert(now);
        }
    }

    fn unique_conflict(&self, other: &Self) -> Option<String> {
        (self.is_active()
            && other.is_active()
            && self.user_id == other.user_id
            && self.id != other.id)
            .then(|| {
                format!(
                    "Key (user_id)=({}) already has an active focus session ({}).",
                    self.user_id, other.id
                )
            })
    }
}

impl TableRow for SessionTaskRef {
    const TABLE: Table = Table::SessionTaskRefs;
    const IMMUTABLE: &'static [&'static str] = &["id", "user_id", "created_at", "title_snapshot"];

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.user_id
    }

    fn rows(doc: &Document) -> &Vec<Self> {
        &doc.session_task_refs
    }

    fn rows_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.session_task_refs
    }

    /// Assigns the next order index within the session unless the caller
    /// supplied a later one.
    fn prepare_insert(fields: &mut Map<String, Value>, existing: &[Self], now: DateTime<Utc>) {
        let session_id = fields.get("session_id").and_then(Value::as_str);
        let next = existing
            .iter()
            .filter(|r| Some(r.session_id.as_str()) == session_id)
            .map(|r| r.order_index + 1)
            .max()
            .unwrap_or(0);
        let requested = fields
            .get("order_index")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok());
        let index = requested.filter(|&n| n >= next).unwrap_or(next);
        fields.insert("order_index".into(), Value::from(index));

        let done = fields.get("is_completed").and_then(Value::as_bool) == Some(true);
        if done && matches!(fields.get("completed_at"), None | Some(Value::Null)) {
            fields.insert("completed_at".into(), timestamp(now));
        }
    }

    fn after_update(&mut self, before: &Self, now: DateTime<Utc>) {
        if !self.is_completed {
            self.completed_at = None;
        } else if !before.is_completed {
            self.completed_at.get_or_insert(now);
        }
    }
}

/// Serialize a timestamp exactly as the row structs do
pub fn timestamp(now: DateTime<Utc>) -> Value {
    serde_json::to_value(now).unwrap_or(Value::Null)
}

fn clamp_priority(value: &Value) -> u8 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match raw {
        Some(p) if p.is_finite() => {
            p.round()
                .clamp(f64::from(MIN_PRIORITY), f64::from(MAX_PRIORITY)) as u8
        }
        _ => DEFAULT_PRIORITY,
    }
}

/// Trim, drop blanks, cap length, dedupe (first occurrence wins), cap count.
/// Accepts a list or a comma-separated string; `null` clears the tags.
fn normalize_tags(value: &Value) -> Option<Vec<String>> {
    let raw: Vec<&str> = match value {
        Value::Null => Vec::new(),
        Value::String(s) => s.split(',').collect(),
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => return None,
    };

    let mut tags: Vec<String> = Vec::new();
    for tag in raw {
        let tag: String = tag.trim().chars().take(MAX_TAG_CHARS).collect();
        if tag.is_empty() || tags.contains(&tag) {
            continue;
        }
        tags.push(tag);
        if tags.len() == MAX_TAGS {
            break;
        }
    }
    Some(tags)
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
