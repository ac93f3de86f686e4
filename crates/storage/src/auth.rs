// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Passcode login and bearer tokens
//!
//! A single 4-character passcode guards the store. A successful sign-in
//! resolves to the one owner account (created on first login) and mints an
//! opaque token. Tokens expire lazily: they are rejected once `now >=
//! expires_at` but stay in the document until purged.
//!
//! These are pure functions over a [`Document`]; [`crate::Store`] runs them
//! inside an exclusive cycle.

use chrono::{DateTime, TimeDelta, Utc};
use lb_core::{opaque_token, AccessToken, AuthConfig, Document, IdGen, User};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;
use thiserror::Error;

/// Exact passcode length, in characters
pub const PASSCODE_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("passcode must be exactly 4 characters")]
    BadFormat,
    #[error("invalid passcode")]
    InvalidPasscode,
    #[error("default passcode is not 4 characters")]
    Misconfigured,
    #[error("missing or invalid access token")]
    Unauthorized,
}

/// Settings the auth functions need from [`crate::StoreConfig`]
#[derive(Debug, Clone)]
pub struct AuthSettings<'a> {
    pub default_passcode: &'a str,
    pub token_ttl: Duration,
    pub owner_email: &'a str,
}

/// Result of a successful sign-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

pub fn is_well_formed(passcode: &str) -> bool {
    passcode.chars().count() == PASSCODE_LEN
}

/// Hex SHA-256 of `salt || passcode`
pub fn hash_passcode(salt: &str, passcode: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(passcode.as_bytes());
    hex_encode(&hasher.finalize())
}

pub fn new_salt() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// A stored config is usable only if it looks like our own output
fn usable_config(config: &AuthConfig) -> bool {
    !config.salt.is_empty()
        && config.passcode_hash.len() == 64
        && config.passcode_hash.chars().all(|c| c.is_ascii_hexdigit())
}

/// Check a candidate against the effective passcode: the stored one if
/// present and well formed, else the configured default.
pub fn verify_passcode(
    doc: &Document,
    settings: &AuthSettings<'_>,
    candidate: &str,
) -> Result<bool, AuthError> {
    match doc.auth.as_ref().filter(|c| usable_config(c)) {
        Some(config) => Ok(hash_passcode(&config.salt, candidate) == config.passcode_hash),
        None if !is_well_formed(settings.default_passcode) => Err(AuthError::Misconfigured),
        None => Ok(candidate == settings.default_passcode),
    }
}

pub fn sign_in(
    doc: &mut Document,
    settings: &AuthSettings<'_>,
    ids: &impl IdGen,
    now: DateTime<Utc>,
    passcode: &str,
) -> Result<AuthSession, AuthError> {
    if !is_well_formed(passcode) {
        return Err(AuthError::BadFormat);
    }
    if !verify_passcode(doc, settings, passcode)? {
        return Err(AuthError::InvalidPasscode);
    }

    let user = ensure_owner(doc, settings, ids, now);
    let ttl = TimeDelta::from_std(settings.token_ttl).unwrap_or(TimeDelta::MAX);
    let token = AccessToken {
        token: opaque_token(),
        user_id: user.id.clone(),
        issued_at: now,
        expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
    };
    let session = AuthSession {
        access_token: token.token.clone(),
        token_type: "bearer".to_string(),
        expires_at: token.expires_at,
        user,
    };
    doc.tokens.push(token);
    Ok(session)
}

fn ensure_owner(
    doc: &mut Document,
    settings: &AuthSettings<'_>,
    ids: &impl IdGen,
    now: DateTime<Utc>,
) -> User {
    if let Some(owner) = doc.owner() {
        return owner.clone();
    }
    let owner = User {
        id: ids.next(),
        email: settings.owner_email.to_string(),
        created_at: now,
        updated_at: now,
    };
    tracing::info!(user_id = %owner.id, "created owner account");
    doc.users.push(owner.clone());
    owner
}

/// The user a token belongs to, if the token exists and has not expired
pub fn resolve_token(doc: &Document, token: &str, now: DateTime<Utc>) -> Option<User> {
    doc.tokens
        .iter()
        .find(|t| t.token == token)
        .filter(|t| t.is_valid_at(now))
        .and_then(|t| doc.user(&t.user_id))
        .cloned()
}

pub fn change_passcode(
    doc: &mut Document,
    settings: &AuthSettings<'_>,
    now: DateTime<Utc>,
    token: &str,
    old: &str,
    new: &str,
) -> Result<(), AuthError> {
    let user = resolve_token(doc, token, now).ok_or(AuthError::Unauthorized)?;
    if doc.owner().map(|o| o.id.as_str()) != Some(user.id.as_str()) {
        return Err(AuthError::Unauthorized);
    }
    if !is_well_formed(old) || !is_well_formed(new) {
        return Err(AuthError::BadFormat);
    }
    if !verify_passcode(doc, settings, old)? {
        return Err(AuthError::InvalidPasscode);
    }

    let salt = new_salt();
    doc.auth = Some(AuthConfig {
        passcode_hash: hash_passcode(&salt, new),
        salt,
        updated_at: now,
    });
    Ok(())
}

/// Remove a token. Returns whether it was present.
pub fn sign_out(doc: &mut Document, token: &str) -> bool {
    let before = doc.tokens.len();
    doc.tokens.retain(|t| t.token != token);
    doc.tokens.len() != before
}

/// Drop every expired token, returning how many were removed
pub fn purge_expired(doc: &mut Document, now: DateTime<Utc>) -> usize {
    let before = doc.tokens.len();
    doc.tokens.retain(|t| t.is_valid_at(now));
    before - doc.tokens.len()
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
