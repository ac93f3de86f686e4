// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use lb_storage::ApiResponse;

/// Print the response envelope as pretty JSON on stdout
pub fn print_response(response: &ApiResponse) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}
