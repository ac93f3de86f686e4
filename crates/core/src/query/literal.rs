// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Literal parsing and value coercion for filter evaluation

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Parse a filter literal: `null`, `true`/`false`, a JSON number, or text
pub fn parse_literal(raw: &str) -> Value {
    match raw {
        "null" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match raw.parse::<Number>() {
            Ok(n) => Value::Number(n),
            Err(_) => Value::String(raw.to_string()),
        },
    }
}

/// Equality with numeric/string coercion: a text value matches a scalar
/// whose textual form is identical, and numbers compare by value.
pub fn loosely_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::String(text), scalar @ (Value::Number(_) | Value::Bool(_)))
        | (scalar @ (Value::Number(_) | Value::Bool(_)), Value::String(text)) => {
            *text == scalar.to_string()
        }
        _ => actual == expected,
    }
}

/// A value coerced into something with a total order
#[derive(Debug, Clone, PartialEq)]
pub enum Comparable {
    Number(f64),
    Time(DateTime<Utc>),
    Text(String),
}

impl Comparable {
    /// Coerce a JSON value. `None` for null, booleans, containers, and
    /// strings that look like timestamps but do not parse as one.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Comparable::Number),
            Value::String(s) if looks_like_iso_date(s) => parse_timestamp(s).map(Comparable::Time),
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Some(Comparable::Number(n)),
                _ => Some(Comparable::Text(s.clone())),
            },
            _ => None,
        }
    }

    /// Compare two values of the same kind; mixed kinds are incomparable
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::Time(a), Comparable::Time(b)) => Some(a.cmp(b)),
            (Comparable::Text(a), Comparable::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total order used for sorting: kinds rank number < time < text
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
            .unwrap_or_else(|| self.rank().cmp(&other.rank()))
    }

    fn rank(&self) -> u8 {
        match self {
            Comparable::Number(_) => 0,
            Comparable::Time(_) => 1,
            Comparable::Text(_) => 2,
        }
    }
}

/// `YYYY-MM-DD` prefix
fn looks_like_iso_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit)
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[path = "literal_tests.rs"]
mod tests;
