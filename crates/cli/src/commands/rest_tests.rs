// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use lb_core::QueryParams;
use serde_json::json;

#[test]
fn key_val_splits_on_first_equals() {
    assert_eq!(
        parse_key_val("and=(a.eq.1,b.eq.x=y)"),
        Ok(("and".to_string(), "(a.eq.1,b.eq.x=y)".to_string()))
    );
    assert!(parse_key_val("status").is_err());
}

#[test]
fn query_args_preserve_order_and_repeats() {
    let args = GetArgs {
        table: "focus_sessions".into(),
        query: QueryArgs {
            query: vec![
                ("elapsed_seconds".into(), "gte.1200".into()),
                ("elapsed_seconds".into(), "lt.3000".into()),
            ],
            minimal: false,
        },
    };
    let request = args.into_request();
    let expected: QueryParams = vec![
        ("elapsed_seconds", "gte.1200"),
        ("elapsed_seconds", "lt.3000"),
    ]
    .into_iter()
    .collect();
    assert_eq!(request.query, expected);
    assert_eq!(request.method, "GET");
    assert_eq!(request.prefer, None);
}

#[test]
fn minimal_flag_sets_prefer() {
    let args = DeleteArgs {
        table: "todos".into(),
        query: QueryArgs {
            query: Vec::new(),
            minimal: true,
        },
    };
    assert_eq!(args.into_request().prefer.as_deref(), Some("return=minimal"));
}

#[test]
fn insert_body_must_be_json() {
    let args = InsertArgs {
        table: "todos".into(),
        body: r#"{"title":"write"}"#.into(),
        query: QueryArgs {
            query: Vec::new(),
            minimal: false,
        },
    };
    assert_eq!(args.into_request().unwrap().body, Some(json!({ "title": "write" })));

    let args = UpdateArgs {
        table: "todos".into(),
        patch: "{title".into(),
        query: QueryArgs {
            query: Vec::new(),
            minimal: false,
        },
    };
    assert!(args.into_request().is_err());
}
