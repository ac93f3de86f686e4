// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw JSON into a well-formed [`Document`]
//!
//! Missing collections default to empty and rows that fail to decode are
//! dropped, as are rows repeating an id already seen in the same table.

use crate::auth::{hash_passcode, is_well_formed, new_salt};
use chrono::{DateTime, Utc};
use lb_core::{AccessToken, AuthConfig, Document, FocusSession, SessionTaskRef, Todo, User};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Normalize a parsed document. `now` stamps legacy passcode upgrades.
pub fn hydrate(raw: Value, now: DateTime<Utc>) -> Document {
    let Value::Object(mut root) = raw else {
        tracing::warn!("document root is not an object, starting from an empty document");
        return Document::empty();
    };

    let version = match root.get("version").and_then(Value::as_u64) {
        Some(v) => u32::try_from(v).unwrap_or(u32::MAX),
        None => Document::CURRENT_VERSION,
    };
    if version != Document::CURRENT_VERSION {
        tracing::warn!(
            version,
            supported = Document::CURRENT_VERSION,
            "unsupported document version, loading best-effort"
        );
    }

    Document {
        version,
        users: take_rows(&mut root, "users", |u: &User| u.id.clone()),
        tokens: take_rows(&mut root, "tokens", |t: &AccessToken| t.token.clone()),
        auth: take_auth(&mut root, now),
        todos: take_rows(&mut root, "todos", |r: &Todo| r.id.clone()),
        focus_sessions: take_rows(&mut root, "focus_sessions", |r: &FocusSession| r.id.clone()),
        session_task_refs: take_rows(&mut root, "session_task_refs", |r: &SessionTaskRef| {
            r.id.clone()
        }),
    }
}

fn take_rows<T: DeserializeOwned>(
    root: &mut Map<String, Value>,
    key: &str,
    id: impl Fn(&T) -> String,
) -> Vec<T> {
    let items = match root.remove(key) {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) => return Vec::new(),
        Some(_) => {
            tracing::warn!(collection = key, "collection is not an array, dropping it");
            return Vec::new();
        }
    };

    let total = items.len();
    let mut seen = HashSet::new();
    let rows: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<T>(item).ok())
        .filter(|row| seen.insert(id(row)))
        .collect();

    if rows.len() < total {
        tracing::warn!(
            collection = key,
            dropped = total - rows.len(),
            "dropped malformed or duplicate rows"
        );
    }
    rows
}

/// Current-format config, or a well-formed legacy cleartext `passcode`
/// hashed in place
fn take_auth(root: &mut Map<String, Value>, now: DateTime<Utc>) -> Option<AuthConfig> {
    let raw = root.remove("auth")?;
    if raw.is_null() {
        return None;
    }
    if let Ok(config) = serde_json::from_value::<AuthConfig>(raw.clone()) {
        return Some(config);
    }

    let legacy = raw.get("passcode").and_then(Value::as_str);
    match legacy {
        Some(passcode) if is_well_formed(passcode) => {
            tracing::warn!("upgrading cleartext passcode to a salted hash");
            let salt = new_salt();
            let updated_at = raw
                .get("updated_at")
                .and_then(|v| serde_json::from_value(v.clone()).ok())
                .unwrap_or(now);
            Some(AuthConfig {
                passcode_hash: hash_passcode(&salt, passcode),
                salt,
                updated_at,
            })
        }
        Some(_) => {
            tracing::warn!("legacy passcode is not 4 characters, falling back to the default");
            None
        }
        None => {
            tracing::warn!("auth config is malformed, falling back to the default passcode");
            None
        }
    }
}

#[cfg(test)]
#[path = "hydrate_tests.rs"]
mod tests;
