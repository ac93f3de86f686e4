// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Query engine: filter, order, slice, project
//!
//! Request parameters arrive as ordered `key=value` pairs. Reserved keys
//! (`select`, `order`, `limit`, `offset`, `and`) configure the query; every
//! other key is a column filter. All filters are AND-ed together.

pub mod filter;
pub mod literal;
pub mod order;
pub mod projection;

pub use filter::{Filter, Op};
pub use literal::{parse_literal, Comparable};
pub use order::{sort_rows, Direction, OrderTerm};
pub use projection::Projection;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Query keys that are never treated as column filters
pub const RESERVED_KEYS: [&str; 5] = ["select", "order", "limit", "offset", "and"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unknown filter operator in '{0}'")]
    UnknownOperator(String),
    #[error("malformed list '{0}', expected (a,b,...)")]
    MalformedList(String),
    #[error("malformed and clause '{0}', expected (col.op.value,...)")]
    MalformedAnd(String),
    #[error("is. accepts null, true or false, got '{0}'")]
    InvalidIs(String),
    #[error("invalid order '{0}'")]
    InvalidOrder(String),
    #[error("invalid limit '{0}'")]
    InvalidLimit(String),
    #[error("invalid offset '{0}'")]
    InvalidOffset(String),
}

/// Ordered request parameters. Keys may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// Last value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A parsed query, ready to run against rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    pub filters: Vec<Filter>,
    pub order: Vec<OrderTerm>,
    pub limit: Option<usize>,
    pub offset: usize,
    pub projection: Projection,
}

impl QuerySpec {
    pub fn parse(params: &QueryParams) -> Result<Self, QueryError> {
        let mut spec = QuerySpec::default();
        for (key, value) in params.iter() {
            match key {
                "select" => spec.projection = Projection::parse(value),
                "order" => spec.order = OrderTerm::parse_list(value)?,
                "limit" => {
                    let limit = value
                        .trim()
                        .parse()
                        .map_err(|_| QueryError::InvalidLimit(value.to_string()))?;
                    spec.limit = Some(limit);
                }
                "offset" => {
                    spec.offset = value
                        .trim()
                        .parse()
                        .map_err(|_| QueryError::InvalidOffset(value.to_string()))?;
                }
                "and" => spec.filters.extend(Filter::parse_and(value)?),
                column => spec.filters.push(Filter::parse(column, value)?),
            }
        }
        Ok(spec)
    }

    /// Whether a row passes every filter
    pub fn matches(&self, row: &Map<String, Value>) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }

    /// Filter, order, slice and project
    pub fn run(&self, rows: Vec<Map<String, Value>>) -> Vec<Value> {
        let mut rows: Vec<_> = rows.into_iter().filter(|r| self.matches(r)).collect();
        sort_rows(&mut rows, &self.order);
        rows.into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .map(|r| self.projection.apply(r))
            .collect()
    }

    /// Project rows without filtering or reordering (write results)
    pub fn project(&self, rows: Vec<Map<String, Value>>) -> Vec<Value> {
        rows.into_iter().map(|r| self.projection.apply(r)).collect()
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
