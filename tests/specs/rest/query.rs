//! Query grammar specs

use crate::prelude::*;

fn seeded() -> (Project, String) {
    let temp = Project::empty();
    let token = temp.sign_in();
    temp.lb()
        .token(&token)
        .args(&[
            "insert",
            "focus_sessions",
            r#"[
                {"state":"ended","elapsed_seconds":600},
                {"state":"ended","elapsed_seconds":1200},
                {"state":"ended","elapsed_seconds":2100},
                {"state":"ended","elapsed_seconds":3000}
            ]"#,
        ])
        .passes();
    (temp, token)
}

fn elapsed(rows: Vec<Value>) -> Vec<Value> {
    rows.into_iter().map(|r| r["elapsed_seconds"].clone()).collect()
}

#[test]
fn range_via_repeated_keys() {
    let (temp, token) = seeded();
    let out = temp
        .lb()
        .token(&token)
        .args(&[
            "get",
            "focus_sessions",
            "-q",
            "elapsed_seconds=gte.1200",
            "-q",
            "elapsed_seconds=lt.3000",
            "-q",
            "order=elapsed_seconds.asc",
        ])
        .passes();
    assert_eq!(elapsed(out.rows()), vec![json!(1200), json!(2100)]);
}

#[test]
fn range_via_and_clause() {
    let (temp, token) = seeded();
    let out = temp
        .lb()
        .token(&token)
        .args(&[
            "get",
            "focus_sessions",
            "-q",
            "and=(elapsed_seconds.gte.1200,elapsed_seconds.lt.3000)",
            "-q",
            "order=elapsed_seconds.desc",
        ])
        .passes();
    assert_eq!(elapsed(out.rows()), vec![json!(2100), json!(1200)]);
}

#[test]
fn in_list_and_empty_in() {
    let (temp, token) = seeded();
    let out = temp
        .lb()
        .token(&token)
        .args(&["get", "focus_sessions", "-q", "elapsed_seconds=in.(600,3000)"])
        .passes();
    assert_eq!(out.rows().len(), 2);

    let out = temp
        .lb()
        .token(&token)
        .args(&["get", "focus_sessions", "-q", "elapsed_seconds=in.()"])
        .passes();
    assert!(out.rows().is_empty());
}

#[test]
fn select_limit_and_offset() {
    let (temp, token) = seeded();
    let out = temp
        .lb()
        .token(&token)
        .args(&[
            "get",
            "focus_sessions",
            "-q",
            "select=elapsed_seconds",
            "-q",
            "order=elapsed_seconds.asc",
            "-q",
            "offset=1",
            "-q",
            "limit=2",
        ])
        .passes();
    assert_eq!(
        out.rows(),
        vec![json!({ "elapsed_seconds": 1200 }), json!({ "elapsed_seconds": 2100 })]
    );
}

#[test]
fn bad_operator_is_a_bad_request() {
    let (temp, token) = seeded();
    temp.lb()
        .token(&token)
        .args(&["get", "focus_sessions", "-q", "elapsed_seconds=about.5"])
        .fails()
        .error_code("BAD_REQUEST");
}
