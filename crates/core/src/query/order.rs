// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `order=col.asc|desc[.nullsfirst|.nullslast],...`

use super::literal::Comparable;
use super::QueryError;
use serde_json::{Map, Value};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTerm {
    pub column: String,
    pub direction: Direction,
    pub nulls_first: bool,
}

impl OrderTerm {
    /// Ascending puts nulls last and descending puts them first unless
    /// overridden.
    pub fn new(column: impl Into<String>, direction: Direction) -> Self {
        Self {
            column: column.into(),
            direction,
            nulls_first: direction == Direction::Desc,
        }
    }

    /// Parse a comma-separated order list
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, QueryError> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::parse)
            .collect()
    }

    fn parse(raw: &str) -> Result<Self, QueryError> {
        let mut parts = raw.split('.');
        let column = parts
            .next()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| QueryError::InvalidOrder(raw.to_string()))?;

        let mut term = Self::new(column, Direction::Asc);
        let mut nulls = None;
        for modifier in parts {
            match modifier {
                "asc" => term.direction = Direction::Asc,
                "desc" => term.direction = Direction::Desc,
                "nullsfirst" => nulls = Some(true),
                "nullslast" => nulls = Some(false),
                _ => return Err(QueryError::InvalidOrder(raw.to_string())),
            }
        }
        term.nulls_first = nulls.unwrap_or(term.direction == Direction::Desc);
        Ok(term)
    }

    fn compare(&self, a: &Map<String, Value>, b: &Map<String, Value>) -> Ordering {
        let a = a.get(&self.column).and_then(Comparable::from_value);
        let b = b.get(&self.column).and_then(Comparable::from_value);
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) if self.nulls_first => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) if self.nulls_first => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => match self.direction {
                Direction::Asc => a.sort_cmp(&b),
                Direction::Desc => b.sort_cmp(&a),
            },
        }
    }
}

/// Stable sort by each term in turn
pub fn sort_rows(rows: &mut [Map<String, Value>], terms: &[OrderTerm]) {
    if terms.is_empty() {
        return;
    }
    rows.sort_by(|a, b| {
        terms
            .iter()
            .map(|t| t.compare(a, b))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
#[path = "order_tests.rs"]
mod tests;
