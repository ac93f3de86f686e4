// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::backend::FakeBackend;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::default();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

#[tokio::test]
async fn traced_backend_passes_results_through() {
    let fake = FakeBackend::new();
    let traced = TracedBackend::new(fake.clone());

    let mut doc = traced.read().await.unwrap();
    doc.version = 9;
    traced.write(&doc).await.unwrap();

    assert_eq!(fake.document().unwrap().version, 9);
    assert_eq!(traced.inner().write_count(), 1);
}

#[test]
fn traced_read_logs_span_and_timing() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedBackend::new(FakeBackend::new());
        traced.read().await
    });

    assert!(result.is_ok());
    assert!(logs.contains("document.read"), "Should log span name. Logs:\n{}", logs);
    assert!(logs.contains("document loaded"), "Logs:\n{}", logs);
    assert!(logs.contains("elapsed_ms"), "Should log timing. Logs:\n{}", logs);
}

#[test]
fn traced_write_logs_failure() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeBackend::new();
        fake.fail_next_writes(1);
        TracedBackend::new(fake).write(&Document::empty()).await
    });

    assert!(result.is_err());
    assert!(logs.contains("document.write"), "Logs:\n{}", logs);
    assert!(logs.contains("write failed"), "Logs:\n{}", logs);
    assert!(logs.contains("injected write failure"), "Logs:\n{}", logs);
}
