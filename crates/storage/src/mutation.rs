// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Owner-scoped select, insert, update and delete over one table
//!
//! Each function either applies its whole change to the [`Document`] or
//! leaves it untouched. Rows belonging to other users are invisible.

use chrono::{DateTime, Utc};
use lb_core::table::timestamp;
use lb_core::{Document, IdGen, QuerySpec, RowError, TableRow, WriteMode};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error(transparent)]
    Row(#[from] RowError),
    #[error("duplicate key value violates unique constraint")]
    Conflict { detail: String },
    #[error("patch has no writable columns")]
    EmptyPatch,
    #[error("invalid body: {0}")]
    InvalidBody(String),
}

/// Who is acting, and when
#[derive(Debug, Clone, Copy)]
pub struct Actor<'a> {
    pub user_id: &'a str,
    pub now: DateTime<Utc>,
}

pub(crate) fn to_map<T: Serialize>(row: &T) -> Map<String, Value> {
    match serde_json::to_value(row) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn from_map<T: TableRow>(map: Map<String, Value>) -> Result<T, RowError> {
    serde_json::from_value(Value::Object(map)).map_err(|e| RowError::new(T::TABLE, e.to_string()))
}

/// Rows of the actor matching `spec`, ordered, sliced and projected
pub fn select<T: TableRow>(doc: &Document, user_id: &str, spec: &QuerySpec) -> Vec<Value> {
    let rows = T::rows(doc)
        .iter()
        .filter(|r| r.owner_id() == user_id)
        .map(to_map)
        .collect();
    spec.run(rows)
}

/// Insert one object or an array of objects.
///
/// Ids, ownership and timestamps are always assigned here; caller-supplied
/// values for them are discarded. A batch is checked against itself as well
/// as the stored rows.
pub fn insert<T: TableRow>(
    doc: &mut Document,
    actor: Actor<'_>,
    ids: &impl IdGen,
    body: Value,
) -> Result<Vec<Map<String, Value>>, MutationError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(fields) => vec![Value::Object(fields)],
        other => {
            return Err(MutationError::InvalidBody(format!(
                "expected an object or an array of objects, got {}",
                kind(&other)
            )))
        }
    };

    let existing = T::rows(doc);
    let mut batch: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(mut fields) = item else {
            return Err(MutationError::InvalidBody(
                "every inserted row must be an object".into(),
            ));
        };
        fields.insert("id".into(), Value::String(ids.next()));
        fields.insert("user_id".into(), Value::String(actor.user_id.to_string()));
        fields.insert("created_at".into(), timestamp(actor.now));
        fields.insert("updated_at".into(), timestamp(actor.now));
        T::normalize(&mut fields, WriteMode::Insert)?;

        let context: Vec<T> = existing.iter().chain(batch.iter()).cloned().collect();
        T::prepare_insert(&mut fields, &context, actor.now);
        let row: T = from_map(fields)?;

        if let Some(detail) = context.iter().find_map(|other| row.unique_conflict(other)) {
            return Err(MutationError::Conflict { detail });
        }
        batch.push(row);
    }

    let inserted = batch.iter().map(to_map).collect();
    T::rows_mut(doc).extend(batch);
    Ok(inserted)
}

/// Merge `patch` into every matching row of the actor.
///
/// Immutable columns are stripped first. Returns the matched rows after the
/// change; no match is not an error.
pub fn update<T: TableRow>(
    doc: &mut Document,
    actor: Actor<'_>,
    spec: &QuerySpec,
    patch: Value,
) -> Result<Vec<Map<String, Value>>, MutationError> {
    let Value::Object(mut patch) = patch else {
        return Err(MutationError::InvalidBody(format!(
            "expected a patch object, got {}",
            kind(&patch)
        )));
    };
    for column in T::IMMUTABLE {
        patch.remove(*column);
    }
    patch.remove("updated_at");
    if patch.is_empty() {
        return Err(MutationError::EmptyPatch);
    }
    T::normalize(&mut patch, WriteMode::Update)?;

    let mut working = T::rows(doc).clone();
    let mut touched = Vec::new();
    for (index, row) in working.iter_mut().enumerate() {
        if row.owner_id() != actor.user_id {
            continue;
        }
        let mut fields = to_map(&*row);
        if !spec.matches(&fields) {
            continue;
        }
        for (column, value) in &patch {
            fields.insert(column.clone(), value.clone());
        }
        fields.insert("updated_at".into(), timestamp(actor.now));

        let mut updated: T = from_map(fields)?;
        updated.after_update(row, actor.now);
        *row = updated;
        touched.push(index);
    }

    for &index in &touched {
        let row = &working[index];
        if let Some(detail) = working.iter().find_map(|other| row.unique_conflict(other)) {
            return Err(MutationError::Conflict { detail });
        }
    }

    let updated = touched.iter().map(|&i| to_map(&working[i])).collect();
    *T::rows_mut(doc) = working;
    Ok(updated)
}

/// Remove every matching row of the actor, returning what was removed
pub fn delete<T: TableRow>(
    doc: &mut Document,
    user_id: &str,
    spec: &QuerySpec,
) -> Vec<Map<String, Value>> {
    let (removed, kept): (Vec<T>, Vec<T>) = std::mem::take(T::rows_mut(doc))
        .into_iter()
        .partition(|row| row.owner_id() == user_id && spec.matches(&to_map(row)));
    *T::rows_mut(doc) = kept;
    removed.iter().map(to_map).collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "mutation_tests.rs"]
mod tests;
