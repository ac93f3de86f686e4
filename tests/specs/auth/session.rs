//! Sign-in, whoami and sign-out specs

use crate::prelude::*;

#[test]
fn first_run_creates_document_and_owner() {
    let temp = Project::empty();
    let out = temp.lb().args(&["sign-in", "0000"]).passes();

    let data = out.json()["data"].clone();
    assert_eq!(data["token_type"], json!("bearer"));
    assert_eq!(data["user"]["email"], json!("owner@localbase.local"));

    let doc = temp.document();
    assert_eq!(doc["version"], json!(1));
    assert_eq!(doc["users"].as_array().unwrap().len(), 1);
    assert_eq!(doc["tokens"].as_array().unwrap().len(), 1);
}

#[test]
fn wrong_passcode_is_rejected() {
    let temp = Project::empty();
    temp.lb()
        .args(&["sign-in", "1234"])
        .fails()
        .error_code("INVALID_PASSCODE");
    temp.lb()
        .args(&["sign-in", "12"])
        .fails()
        .error_code("PASSCODE_BAD_FORMAT");
}

#[test]
fn default_passcode_comes_from_env() {
    let temp = Project::empty();
    temp.lb()
        .env("LOCALBASE_DEFAULT_PASSCODE", "2468")
        .args(&["sign-in", "2468"])
        .passes();
}

#[test]
fn misconfigured_default_passcode() {
    let temp = Project::empty();
    temp.lb()
        .env("LOCALBASE_DEFAULT_PASSCODE", "123")
        .args(&["sign-in", "1234"])
        .fails()
        .error_code("SERVER_MISCONFIGURED");
}

#[test]
fn whoami_resolves_token() {
    let temp = Project::empty();
    let token = temp.sign_in();

    let out = temp.lb().token(&token).args(&["whoami"]).passes();
    assert_eq!(
        out.json()["data"]["user"]["email"],
        json!("owner@localbase.local")
    );

    temp.lb()
        .token("not-a-token")
        .args(&["whoami"])
        .fails()
        .error_code("UNAUTHORIZED");
}

#[test]
fn sign_out_revokes_token() {
    let temp = Project::empty();
    let token = temp.sign_in();

    temp.lb().token(&token).args(&["sign-out"]).passes();
    temp.lb()
        .token(&token)
        .args(&["whoami"])
        .fails()
        .error_code("UNAUTHORIZED");
    // Revoking again is harmless
    temp.lb().token(&token).args(&["sign-out"]).passes();
}

#[test]
fn token_flag_overrides_env() {
    let temp = Project::empty();
    let token = temp.sign_in();
    temp.lb()
        .token("stale")
        .args(&["--token", &token, "whoami"])
        .passes();
}
