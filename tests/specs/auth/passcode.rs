//! Passcode rotation specs

use crate::prelude::*;

#[test]
fn rotation_replaces_the_effective_passcode() {
    let temp = Project::empty();
    let token = temp.sign_in();

    temp.lb()
        .token(&token)
        .args(&["passcode", "0000", "4321"])
        .passes()
        .stdout_has("\"updated\": true");

    temp.lb()
        .args(&["sign-in", "0000"])
        .fails()
        .error_code("INVALID_PASSCODE");
    temp.lb().args(&["sign-in", "4321"]).passes();
}

#[test]
fn rotation_requires_old_passcode() {
    let temp = Project::empty();
    let token = temp.sign_in();

    temp.lb()
        .token(&token)
        .args(&["passcode", "1111", "4321"])
        .fails()
        .error_code("INVALID_PASSCODE");
    temp.lb().args(&["sign-in", "0000"]).passes();
}

#[test]
fn passcode_is_never_stored_in_cleartext() {
    let temp = Project::empty();
    let token = temp.sign_in();
    temp.lb()
        .token(&token)
        .args(&["passcode", "0000", "zq7x"])
        .passes();

    let doc = temp.document();
    assert!(doc["auth"]["passcode_hash"].is_string());
    assert!(!doc.to_string().contains("zq7x"));
}

#[test]
fn legacy_cleartext_passcode_still_works() {
    let temp = Project::empty();
    temp.file(r#"{ "version": 1, "auth": { "passcode": "1357", "updated_at": "2026-01-01T00:00:00Z" } }"#);

    temp.lb().args(&["sign-in", "1357"]).passes();
    let doc = temp.document();
    assert!(doc["auth"].get("passcode").is_none());
    assert!(doc["auth"]["passcode_hash"].is_string());
}
