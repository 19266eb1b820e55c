//! Scoped tracing spans.
//!
//! # Responsibilities
//! - Open a named span for the duration of a request
//! - Collect attributes, timestamped events, and a terminal status
//! - Guarantee the span is exported on every exit path (RAII)
//!
//! # Design Decisions
//! - `ScopedSpan` is a cheap clonable handle; the span is finalized when the
//!   last handle drops, so early returns and `?` cannot skip export
//! - Export goes through the `SpanExporter` trait; the production exporter
//!   writes a structured log line, tests install a recording exporter
//! - Export failures are swallowed after a debug log; a broken exporter
//!   never affects the request outcome
//! - A status that was never set is exported as `None`, not inferred

use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Terminal status of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStatus {
    Ok,
    Error,
}

/// A timestamped event recorded within a span.
#[derive(Debug, Clone)]
pub struct SpanEvent {
    /// Event description.
    pub text: String,
    /// Offset from span start, in milliseconds.
    pub elapsed_ms: f64,
}

/// An immutable, finalized span handed to the exporter.
#[derive(Debug, Clone)]
pub struct FinishedSpan {
    pub name: String,
    pub status: Option<SpanStatus>,
    pub attributes: Vec<(String, String)>,
    pub events: Vec<SpanEvent>,
    pub duration_ms: f64,
}

/// Destination for finalized spans.
///
/// Implementations must be infallible from the request's point of view:
/// a returned error is logged at debug level and dropped.
pub trait SpanExporter: Send + Sync {
    fn export(&self, span: FinishedSpan) -> Result<(), ExportError>;
}

/// Error reported by a span exporter.
#[derive(Debug, thiserror::Error)]
#[error("span export failed: {0}")]
pub struct ExportError(pub String);

/// Exporter that emits each finished span as a structured log event.
pub struct LogSpanExporter;

impl SpanExporter for LogSpanExporter {
    fn export(&self, span: FinishedSpan) -> Result<(), ExportError> {
        let status = match span.status {
            Some(SpanStatus::Ok) => "OK",
            Some(SpanStatus::Error) => "ERROR",
            None => "UNSET",
        };
        tracing::debug!(
            target: "course_catalog::span",
            span_name = %span.name,
            status = status,
            duration_ms = span.duration_ms,
            attributes = ?span.attributes,
            events = ?span.events,
            "span finished"
        );
        Ok(())
    }
}

struct SpanState {
    name: String,
    status: Option<SpanStatus>,
    attributes: Vec<(String, String)>,
    events: Vec<SpanEvent>,
    started: Instant,
}

struct SpanInner {
    state: Mutex<SpanState>,
    exporter: Arc<dyn SpanExporter>,
}

impl Drop for SpanInner {
    fn drop(&mut self) {
        let state = match self.state.get_mut() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        let finished = FinishedSpan {
            name: std::mem::take(&mut state.name),
            status: state.status,
            attributes: std::mem::take(&mut state.attributes),
            events: std::mem::take(&mut state.events),
            duration_ms: state.started.elapsed().as_secs_f64() * 1000.0,
        };
        if let Err(e) = self.exporter.export(finished) {
            tracing::debug!(error = %e, "dropping span: exporter unavailable");
        }
    }
}

/// Handle to an open span.
///
/// Clones share the same underlying span; the span is sealed and exported
/// when the last clone drops. Handles are never shared across requests.
#[derive(Clone)]
pub struct ScopedSpan {
    inner: Arc<SpanInner>,
}

impl ScopedSpan {
    /// Attach a string attribute to the span.
    pub fn set_attribute(&self, key: &str, value: impl Into<String>) {
        if let Ok(mut state) = self.inner.state.lock() {
            state.attributes.push((key.to_string(), value.into()));
        }
    }

    /// Record a timestamped event.
    pub fn add_event(&self, text: impl Into<String>) {
        if let Ok(mut state) = self.inner.state.lock() {
            let elapsed_ms = state.started.elapsed().as_secs_f64() * 1000.0;
            state.events.push(SpanEvent {
                text: text.into(),
                elapsed_ms,
            });
        }
    }

    /// Set the terminal status. The wrapper sets this exactly once.
    pub fn set_status(&self, status: SpanStatus) {
        if let Ok(mut state) = self.inner.state.lock() {
            state.status = Some(status);
        }
    }
}

/// Factory for scoped spans bound to a single exporter.
pub struct Tracer {
    exporter: Arc<dyn SpanExporter>,
}

impl Tracer {
    /// Create a tracer exporting to the given destination.
    pub fn new(exporter: Arc<dyn SpanExporter>) -> Self {
        Self { exporter }
    }

    /// Open a named span. Opening never fails.
    pub fn open(&self, name: &str) -> ScopedSpan {
        ScopedSpan {
            inner: Arc::new(SpanInner {
                state: Mutex::new(SpanState {
                    name: name.to_string(),
                    status: None,
                    attributes: Vec::new(),
                    events: Vec::new(),
                    started: Instant::now(),
                }),
                exporter: self.exporter.clone(),
            }),
        }
    }
}
