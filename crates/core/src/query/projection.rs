// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Column projection (`select=a,b`)

use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Projection {
    #[default]
    All,
    Columns(Vec<String>),
}

impl Projection {
    /// `*` or an empty list selects every column
    pub fn parse(raw: &str) -> Self {
        let columns: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        if columns.is_empty() || columns.iter().any(|c| c == "*") {
            Projection::All
        } else {
            Projection::Columns(columns)
        }
    }

    /// Unknown columns are silently omitted
    pub fn apply(&self, mut row: Map<String, Value>) -> Value {
        match self {
            Projection::All => Value::Object(row),
            Projection::Columns(columns) => Value::Object(
                columns
                    .iter()
                    .filter_map(|c| row.remove(c).map(|v| (c.clone(), v)))
                    .collect(),
            ),
        }
    }
}
