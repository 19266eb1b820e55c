//! Shared utilities for integration testing.
//!
//! Spawns the real server on an ephemeral port with a temp-file catalog,
//! a fresh metric sink, and a recording span exporter, then drives it
//! over HTTP with reqwest.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::net::TcpListener;

use course_catalog::config::CatalogConfig;
use course_catalog::http::CatalogServer;
use course_catalog::lifecycle::Shutdown;
use course_catalog::observability::{
    ExportError, FinishedSpan, MetricSink, SpanExporter, Telemetry, Tracer,
};

/// Exporter that records finished spans for inspection.
#[derive(Default)]
pub struct RecordingExporter {
    spans: Mutex<Vec<FinishedSpan>>,
}

impl RecordingExporter {
    /// All spans finished so far.
    pub fn finished(&self) -> Vec<FinishedSpan> {
        self.spans.lock().unwrap().clone()
    }

    /// All spans with the given name.
    pub fn named(&self, name: &str) -> Vec<FinishedSpan> {
        self.finished()
            .into_iter()
            .filter(|span| span.name == name)
            .collect()
    }
}

impl SpanExporter for RecordingExporter {
    fn export(&self, span: FinishedSpan) -> Result<(), ExportError> {
        self.spans.lock().unwrap().push(span);
        Ok(())
    }
}

/// A running server instance plus handles into its telemetry.
pub struct TestApp {
    pub base_url: String,
    pub catalog_path: PathBuf,
    pub sink: Arc<MetricSink>,
    pub spans: Arc<RecordingExporter>,
    pub client: reqwest::Client,
    shutdown: Shutdown,
    _dir: tempfile::TempDir,
}

impl TestApp {
    /// GET a path, without following redirects.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("server unreachable")
    }

    /// POST a form to a path, without following redirects.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .form(form)
            .send()
            .await
            .expect("server unreachable")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Spawn a fresh server instance with isolated telemetry and storage.
pub async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let catalog_path = dir.path().join("course_catalog.json");

    let mut config = CatalogConfig::default();
    config.catalog.file_path = catalog_path.to_string_lossy().into_owned();
    // Exporter backends stay out of tests: telemetry is observed through
    // the injected sink and recording exporter instead.
    config.observability.metrics_enabled = false;
    config.observability.export_interval_secs = 0;

    let spans = Arc::new(RecordingExporter::default());
    let sink = Arc::new(MetricSink::new());
    let telemetry = Arc::new(Telemetry::new(Tracer::new(spans.clone()), sink.clone()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    let server = CatalogServer::new(config, telemetry);
    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap();

    TestApp {
        base_url: format!("http://{addr}"),
        catalog_path,
        sink,
        spans,
        client,
        shutdown,
        _dir: dir,
    }
}
