//! Shared helpers for CLI specs

pub use serde_json::{json, Value};

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::OnceLock;
use tempfile::TempDir;

/// Path to the `localbase` binary, building it once if the workspace
/// hasn't produced it yet.
fn binary() -> &'static Path {
    static BIN: OnceLock<PathBuf> = OnceLock::new();
    BIN.get_or_init(|| {
        if let Ok(path) = assert_cmd::cargo::cargo_bin("localbase").canonicalize() {
            return path;
        }
        let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
        let status = std::process::Command::new(cargo)
            .args(["build", "-p", "localbase"])
            .status()
            .expect("failed to run cargo build");
        assert!(status.success(), "building localbase failed");
        assert_cmd::cargo::cargo_bin("localbase")
    })
}

/// An isolated store directory
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn db_path(&self) -> PathBuf {
        self.path().join("data/db.json")
    }

    /// Parsed contents of the backing document
    pub fn document(&self) -> Value {
        let bytes = std::fs::read(self.db_path()).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Write a raw backing document
    pub fn file(&self, contents: &str) {
        let path = self.db_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    /// `localbase` bound to this project's store, with a clean environment
    pub fn lb(&self) -> Cli {
        let mut cmd = Command::new(binary());
        cmd.current_dir(self.path())
            .env_remove("LOCALBASE_TOKEN")
            .env_remove("LOCALBASE_DEFAULT_PASSCODE")
            .env_remove("LOCALBASE_TOKEN_TTL")
            .env_remove("RUST_LOG")
            .env("LOCALBASE_PATH", self.db_path());
        Cli { cmd }
    }

    /// Sign in with the default passcode and return the token
    pub fn sign_in(&self) -> String {
        let out = self.lb().args(&["sign-in", "0000"]).passes();
        out.json()["data"]["access_token"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn token(self, token: &str) -> Self {
        self.env("LOCALBASE_TOKEN", token)
    }

    /// Run and require exit status 0
    pub fn passes(mut self) -> RunResult {
        let output = self.cmd.output().unwrap();
        let result = RunResult { output };
        assert!(
            result.output.status.success(),
            "expected success, got {:?}\nstdout:\n{}\nstderr:\n{}",
            result.output.status.code(),
            result.stdout(),
            result.stderr()
        );
        result
    }

    /// Run and require a non-zero exit status
    pub fn fails(mut self) -> RunResult {
        let output = self.cmd.output().unwrap();
        let result = RunResult { output };
        assert!(
            !result.output.status.success(),
            "expected failure\nstdout:\n{}",
            result.stdout()
        );
        result
    }
}

pub struct RunResult {
    output: Output,
}

impl RunResult {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).to_string()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).to_string()
    }

    pub fn code(&self) -> Option<i32> {
        self.output.status.code()
    }

    /// stdout parsed as JSON
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.output.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}):\n{}", self.stdout()))
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(needle),
            "stdout missing {:?}:\n{}",
            needle,
            stdout
        );
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(needle),
            "stderr missing {:?}:\n{}",
            needle,
            stderr
        );
        self
    }

    /// Assert the response's error code
    pub fn error_code(self, code: &str) -> Self {
        similar_asserts::assert_eq!(self.json()["error"]["code"], json!(code));
        self
    }

    /// Rows in the response's `data`
    pub fn rows(&self) -> Vec<Value> {
        match self.json()["data"].clone() {
            Value::Array(rows) => rows,
            other => panic!("data is not an array: {other}"),
        }
    }
}
