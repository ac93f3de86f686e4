//! Unique active session specs

use crate::prelude::*;

#[test]
fn second_active_session_conflicts() {
    let temp = Project::empty();
    let token = temp.sign_in();
    temp.lb()
        .token(&token)
        .args(&["insert", "focus_sessions", "{}"])
        .passes();

    let out = temp
        .lb()
        .token(&token)
        .args(&["insert", "focus_sessions", r#"{"state":"active"}"#])
        .fails()
        .error_code("23505");
    assert_eq!(out.json()["status"], json!(409));
    assert!(out.json()["error"]["details"]
        .as_str()
        .unwrap()
        .contains("already has an active focus session"));

    assert_eq!(
        temp.document()["focus_sessions"].as_array().unwrap().len(),
        1
    );
}

#[test]
fn ending_the_active_session_allows_a_new_one() {
    let temp = Project::empty();
    let token = temp.sign_in();
    temp.lb()
        .token(&token)
        .args(&["insert", "focus_sessions", "{}"])
        .passes();
    let out = temp
        .lb()
        .token(&token)
        .args(&[
            "update",
            "focus_sessions",
            r#"{"state":"ended"}"#,
            "-q",
            "state=eq.active",
        ])
        .passes();
    assert!(out.rows()[0]["ended_at"].is_string());

    temp.lb()
        .token(&token)
        .args(&["insert", "focus_sessions", "{}"])
        .passes();
}
