// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `localbase get|insert|update|delete <table>` - Table access

use anyhow::{Context, Result};
use clap::Args;
use lb_storage::RestRequest;
use serde_json::Value;

/// Query parameters shared by every table command
#[derive(Args)]
pub struct QueryArgs {
    /// Query parameter (key=value), e.g. `-q status=eq.pending -q order=created_at.desc`
    #[arg(short = 'q', long = "query", value_parser = parse_key_val)]
    pub query: Vec<(String, String)>,

    /// Return no rows from writes
    #[arg(long)]
    pub minimal: bool,
}

impl QueryArgs {
    fn apply(self, mut request: RestRequest) -> RestRequest {
        for (key, value) in self.query {
            request = request.with_query(key, value);
        }
        if self.minimal {
            request = request.with_prefer("return=minimal");
        }
        request
    }
}

#[derive(Args)]
pub struct GetArgs {
    /// Table name
    pub table: String,
    #[command(flatten)]
    pub query: QueryArgs,
}

impl GetArgs {
    pub fn into_request(self) -> RestRequest {
        self.query.apply(RestRequest::get(self.table))
    }
}

#[derive(Args)]
pub struct InsertArgs {
    /// Table name
    pub table: String,
    /// Row object or array of row objects, as JSON
    pub body: String,
    #[command(flatten)]
    pub query: QueryArgs,
}

impl InsertArgs {
    pub fn into_request(self) -> Result<RestRequest> {
        let body = parse_body(&self.body)?;
        Ok(self.query.apply(RestRequest::post(self.table, body)))
    }
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Table name
    pub table: String,
    /// Patch object, as JSON
    pub patch: String,
    #[command(flatten)]
    pub query: QueryArgs,
}

impl UpdateArgs {
    pub fn into_request(self) -> Result<RestRequest> {
        let patch = parse_body(&self.patch)?;
        Ok(self.query.apply(RestRequest::patch(self.table, patch)))
    }
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Table name
    pub table: String,
    #[command(flatten)]
    pub query: QueryArgs,
}

impl DeleteArgs {
    pub fn into_request(self) -> RestRequest {
        self.query.apply(RestRequest::delete(self.table))
    }
}

fn parse_body(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).with_context(|| format!("body is not valid JSON: {raw}"))
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid key=value: no `=` found in `{s}`"))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

#[cfg(test)]
#[path = "rest_tests.rs"]
mod tests;
