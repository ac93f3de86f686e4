//! Insert, update and delete specs

use crate::prelude::*;

#[test]
fn insert_then_get() {
    let temp = Project::empty();
    let token = temp.sign_in();

    let out = temp
        .lb()
        .token(&token)
        .args(&["insert", "todos", r#"{"title":"write report","priority":9,"tags":"a, b,a"}"#])
        .passes();
    assert_eq!(out.json()["status"], json!(201));
    let row = out.rows()[0].clone();
    assert_eq!(row["priority"], json!(3));
    assert_eq!(row["tags"], json!(["a", "b"]));
    assert_eq!(row["category"], json!("未分类"));

    let out = temp.lb().token(&token).args(&["get", "todos"]).passes();
    assert_eq!(out.rows(), vec![row]);
}

#[test]
fn update_patches_matching_rows() {
    let temp = Project::empty();
    let token = temp.sign_in();
    temp.lb()
        .token(&token)
        .args(&["insert", "todos", r#"[{"title":"a"},{"title":"b"}]"#])
        .passes();

    let out = temp
        .lb()
        .token(&token)
        .args(&["update", "todos", r#"{"status":"completed"}"#, "-q", "title=eq.a"])
        .passes();
    let rows = out.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], json!("completed"));
    assert!(rows[0]["completed_at"].is_string());
}

#[test]
fn delete_returns_removed_rows() {
    let temp = Project::empty();
    let token = temp.sign_in();
    temp.lb()
        .token(&token)
        .args(&["insert", "todos", r#"[{"title":"a"},{"title":"b"}]"#])
        .passes();

    let out = temp
        .lb()
        .token(&token)
        .args(&["delete", "todos", "-q", "title=eq.b"])
        .passes();
    assert_eq!(out.rows().len(), 1);
    assert_eq!(temp.document()["todos"].as_array().unwrap().len(), 1);

    let out = temp
        .lb()
        .token(&token)
        .args(&["delete", "todos", "-q", "title=eq.zzz"])
        .passes();
    assert!(out.rows().is_empty());
    assert_eq!(temp.document()["todos"].as_array().unwrap().len(), 1);
}

#[test]
fn minimal_writes_return_no_rows() {
    let temp = Project::empty();
    let token = temp.sign_in();
    let out = temp
        .lb()
        .token(&token)
        .args(&["insert", "todos", r#"{"title":"a"}"#, "--minimal"])
        .passes();
    assert_eq!(out.json()["data"], json!(null));
    assert_eq!(out.json()["status"], json!(201));
}

#[test]
fn unknown_table_is_not_found() {
    let temp = Project::empty();
    let token = temp.sign_in();
    temp.lb()
        .token(&token)
        .args(&["get", "users"])
        .fails()
        .error_code("TABLE_NOT_FOUND");
}
