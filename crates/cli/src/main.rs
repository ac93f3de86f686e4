// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow unwrap in test code
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! localbase - embedded table store CLI

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{auth, rest};
use lb_storage::{FileClient, StoreConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "localbase",
    version,
    about = "localbase - a passcode-guarded JSON table store"
)]
struct Cli {
    /// Backing document path
    #[arg(long, global = true, env = "LOCALBASE_PATH")]
    db: Option<PathBuf>,

    /// Bearer token from a previous sign-in
    #[arg(long, global = true, env = "LOCALBASE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exchange the passcode for a bearer token
    SignIn(auth::SignInArgs),
    /// Show the user the token belongs to
    Whoami,
    /// Revoke the token
    SignOut,
    /// Change the passcode
    Passcode(auth::PasscodeArgs),
    /// Select rows
    Get(rest::GetArgs),
    /// Insert a row or an array of rows
    Insert(rest::InsertArgs),
    /// Patch matching rows
    Update(rest::UpdateArgs),
    /// Delete matching rows
    Delete(rest::DeleteArgs),
    /// Call a remote procedure
    Rpc {
        /// Procedure name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    setup_logging();
    let cli = Cli::parse();

    let mut config = StoreConfig::from_env()?;
    if let Some(path) = cli.db {
        config = config.with_path(path);
    }
    tracing::debug!(path = %config.path.display(), "opening store");

    let client = FileClient::open(config);
    if let Some(token) = cli.token {
        client.set_token(Some(token));
    }

    let response = match cli.command {
        Commands::SignIn(args) => client.auth().sign_in(&args.passcode).await?,
        Commands::Whoami => client.auth().get_user().await?,
        Commands::SignOut => client.auth().sign_out().await?,
        Commands::Passcode(args) => client.auth().change_passcode(&args.old, &args.new).await?,
        Commands::Get(args) => client.rest(args.into_request()).await?,
        Commands::Insert(args) => client.rest(args.into_request()?).await?,
        Commands::Update(args) => client.rest(args.into_request()?).await?,
        Commands::Delete(args) => client.rest(args.into_request()).await?,
        Commands::Rpc { name } => client.rpc(&name),
    };

    output::print_response(&response)?;
    Ok(if response.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Logs go to stderr so stdout stays machine-readable
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
