//! Error reporting specs

use crate::prelude::*;

#[test]
fn error_response_exits_non_zero_with_json() {
    let temp = Project::empty();
    let out = temp.lb().args(&["get", "todos"]).fails();
    assert_eq!(out.code(), Some(1));
    let out = out.error_code("UNAUTHORIZED");
    assert_eq!(out.json()["status"], json!(401));
}

#[test]
fn unparsable_document_is_fatal() {
    let temp = Project::empty();
    temp.file("{ not json");

    temp.lb()
        .args(&["sign-in", "0000"])
        .fails()
        .stderr_has("json error");
}

#[test]
fn invalid_body_json_is_rejected_before_the_store() {
    let temp = Project::empty();
    let token = temp.sign_in();
    temp.lb()
        .token(&token)
        .args(&["insert", "todos", "{title"])
        .fails()
        .stderr_has("body is not valid JSON");
}

#[test]
fn malformed_query_flag_is_a_usage_error() {
    let temp = Project::empty();
    temp.lb()
        .args(&["get", "todos", "-q", "status"])
        .fails()
        .stderr_has("invalid key=value");
}

#[test]
fn rpc_is_not_implemented() {
    let temp = Project::empty();
    temp.lb()
        .args(&["rpc", "start_focus"])
        .fails()
        .error_code("RPC_NOT_IMPLEMENTED");
}
