//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    let temp = Project::empty();
    temp.lb()
        .args(&["--help"])
        .passes()
        .stdout_has("sign-in")
        .stdout_has("get")
        .stdout_has("insert")
        .stdout_has("rpc");
}

#[test]
fn get_help_documents_query_flag() {
    let temp = Project::empty();
    temp.lb()
        .args(&["get", "--help"])
        .passes()
        .stdout_has("--query")
        .stdout_has("--minimal");
}
