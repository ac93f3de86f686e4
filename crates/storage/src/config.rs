// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store configuration

use crate::error::StoreError;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the backing file path
pub const ENV_PATH: &str = "LOCALBASE_PATH";
/// Environment variable overriding the passcode used before one is set
pub const ENV_DEFAULT_PASSCODE: &str = "LOCALBASE_DEFAULT_PASSCODE";
/// Environment variable overriding token lifetime (humantime, e.g. `30days`)
pub const ENV_TOKEN_TTL: &str = "LOCALBASE_TOKEN_TTL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path of the backing JSON document
    pub path: PathBuf,
    /// Passcode accepted until one is stored in the document
    pub default_passcode: String,
    /// Lifetime of issued access tokens
    pub token_ttl: Duration,
    /// Email recorded on the lazily created owner account
    pub owner_email: String,
}

impl StoreConfig {
    pub const DEFAULT_PATH: &'static str = ".localbase/db.json";
    pub const DEFAULT_PASSCODE: &'static str = "0000";
    pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);
    pub const DEFAULT_OWNER_EMAIL: &'static str = "owner@localbase.local";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            default_passcode: Self::DEFAULT_PASSCODE.to_string(),
            token_ttl: Self::DEFAULT_TOKEN_TTL,
            owner_email: Self::DEFAULT_OWNER_EMAIL.to_string(),
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_default_passcode(mut self, passcode: impl Into<String>) -> Self {
        self.default_passcode = passcode.into();
        self
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_owner_email(mut self, email: impl Into<String>) -> Self {
        self.owner_email = email.into();
        self
    }

    /// Build from `LOCALBASE_*` environment variables
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StoreError> {
        let mut config = Self::default();
        if let Some(path) = lookup(ENV_PATH).filter(|p| !p.is_empty()) {
            config.path = PathBuf::from(path);
        }
        if let Some(passcode) = lookup(ENV_DEFAULT_PASSCODE) {
            // Length is checked when the default is actually used
            config.default_passcode = passcode;
        }
        if let Some(ttl) = lookup(ENV_TOKEN_TTL) {
            config.token_ttl =
                humantime::parse_duration(&ttl).map_err(|e| StoreError::InvalidConfig {
                    key: ENV_TOKEN_TTL,
                    message: e.to_string(),
                })?;
        }
        Ok(config)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PATH)
    }
}
