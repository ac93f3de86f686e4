// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filter grammar: `column=op.value` clauses parsed into an AST
//!
//! Supported operators: `eq`, `neq`, `gt`, `gte`, `lt`, `lte`, `in.(a,b)`,
//! and `is.null|true|false`. A compound `and=(col.op.value,...)` clause is
//! split into the same [`Filter`] nodes.

use super::literal::{loosely_equal, parse_literal, Comparable};
use super::QueryError;
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// One parsed predicate operator
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Eq(Value),
    Neq(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    Is(Value),
}

impl Op {
    /// Parse `op.value`
    pub fn parse(expr: &str) -> Result<Self, QueryError> {
        let (name, raw) = expr
            .split_once('.')
            .ok_or_else(|| QueryError::UnknownOperator(expr.to_string()))?;

        let op = match name {
            "eq" => Op::Eq(parse_literal(raw)),
            "neq" => Op::Neq(parse_literal(raw)),
            "gt" => Op::Gt(parse_literal(raw)),
            "gte" => Op::Gte(parse_literal(raw)),
            "lt" => Op::Lt(parse_literal(raw)),
            "lte" => Op::Lte(parse_literal(raw)),
            "in" => Op::In(parse_list(raw)?),
            "is" => match parse_literal(raw) {
                v @ (Value::Null | Value::Bool(_)) => Op::Is(v),
                _ => return Err(QueryError::InvalidIs(raw.to_string())),
            },
            _ => return Err(QueryError::UnknownOperator(expr.to_string())),
        };
        Ok(op)
    }

    /// Evaluate against a column value (`Null` when the column is absent)
    pub fn matches(&self, actual: &Value) -> bool {
        match self {
            Op::Eq(expected) => loosely_equal(actual, expected),
            Op::Neq(expected) => !actual.is_null() && !loosely_equal(actual, expected),
            Op::Gt(bound) => compares(actual, bound, |o| o == Ordering::Greater),
            Op::Gte(bound) => compares(actual, bound, |o| o != Ordering::Less),
            Op::Lt(bound) => compares(actual, bound, |o| o == Ordering::Less),
            Op::Lte(bound) => compares(actual, bound, |o| o != Ordering::Greater),
            Op::In(set) => set.iter().any(|v| loosely_equal(actual, v)),
            Op::Is(expected) => actual == expected,
        }
    }
}

fn compares(actual: &Value, bound: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    let (Some(a), Some(b)) = (Comparable::from_value(actual), Comparable::from_value(bound)) else {
        return false;
    };
    a.compare(&b).is_some_and(accept)
}

/// `(a,b,c)` into literals; `()` is the empty set
fn parse_list(raw: &str) -> Result<Vec<Value>, QueryError> {
    let inner = raw
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| QueryError::MalformedList(raw.to_string()))?;
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(inner
        .split(',')
        .map(|item| parse_literal(unquote(item.trim())))
        .collect())
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

/// A column predicate
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: Op,
}

impl Filter {
    pub fn new(column: impl Into<String>, op: Op) -> Self {
        Self {
            column: column.into(),
            op,
        }
    }

    /// Parse a simple `column=op.value` query pair
    pub fn parse(column: &str, expr: &str) -> Result<Self, QueryError> {
        Ok(Self::new(column, Op::parse(expr)?))
    }

    /// Parse an `and=(col.op.value,...)` clause into its members
    pub fn parse_and(clause: &str) -> Result<Vec<Self>, QueryError> {
        let inner = clause
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(|| QueryError::MalformedAnd(clause.to_string()))?;

        split_top_level(inner)
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .map(|part| {
                let (column, expr) = part
                    .trim()
                    .split_once('.')
                    .ok_or_else(|| QueryError::MalformedAnd(clause.to_string()))?;
                Self::parse(column, expr)
            })
            .collect()
    }

    pub fn matches(&self, row: &Map<String, Value>) -> bool {
        self.op.matches(row.get(&self.column).unwrap_or(&Value::Null))
    }
}

/// Split on commas that are not nested inside parentheses
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
