// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `localbase sign-in` / `passcode` arguments

use clap::Args;

#[derive(Args)]
pub struct SignInArgs {
    /// Four-character passcode
    pub passcode: String,
}

#[derive(Args)]
pub struct PasscodeArgs {
    /// Current passcode
    pub old: String,
    /// New four-character passcode
    pub new: String,
}
