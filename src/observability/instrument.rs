//! Request instrumentation wrapper.
//!
//! # Responsibilities
//! - Wrap every handler body with the uniform telemetry contract:
//!   one counter increment, one span, one terminal log event, and one
//!   processing-time observation per request
//! - Translate handler outcomes into user-facing responses without
//!   leaking fault internals
//!
//! # Data Flow
//! ```text
//! inbound call
//!     → increment request counter
//!     → open span, set standard attributes
//!     → await handler body (may touch the catalog store)
//!     → branch on outcome: success / validation / not-found / fault
//!     → record processing time (always)
//!     → span sealed by RAII, response returned
//! ```
//!
//! # Design Decisions
//! - The request context is an explicit value built from the request,
//!   never read from ambient globals
//! - Processing time is recorded on every exit path; the skipped-on-redirect
//!   behavior some ad hoc instrumentations show is an accident, not policy
//! - Validation failures are not exceptions and do not mark the span ERROR;
//!   lookup misses mark the span ERROR but are not exceptions either

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::observability::logging::{emit_log, LogLevel};
use crate::observability::metrics::MetricSink;
use crate::observability::span::{ScopedSpan, SpanStatus, Tracer};

/// Telemetry facilities shared by every request.
///
/// Constructed once in `main` and injected through `AppState`.
pub struct Telemetry {
    pub tracer: Tracer,
    pub metrics: Arc<MetricSink>,
}

impl Telemetry {
    pub fn new(tracer: Tracer, metrics: Arc<MetricSink>) -> Self {
        Self { tracer, metrics }
    }
}

/// Per-request context, created at wrapper entry and discarded at exit.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Canonical route label, shared by the span name and every metric.
    pub route: &'static str,
    pub method: String,
    pub url: String,
    pub ip: String,
    pub request_id: String,
    /// Monotonic start timestamp.
    pub started: Instant,
}

/// Successful handler output: the response plus the log event describing it.
pub struct Handled {
    pub response: Response,
    pub event: &'static str,
    pub fields: Vec<(&'static str, String)>,
}

impl Handled {
    pub fn new(response: impl IntoResponse, event: &'static str) -> Self {
        Self {
            response: response.into_response(),
            event,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((key, value.into()));
        self
    }
}

/// Run a handler body under the uniform telemetry contract.
///
/// The body receives a clone of the span handle so it can attach custom
/// attributes and events; the wrapper owns span status and finalization.
pub async fn instrument<F, Fut>(telemetry: &Telemetry, ctx: RequestContext, handler: F) -> Response
where
    F: FnOnce(ScopedSpan) -> Fut,
    Fut: Future<Output = Result<Handled, AppError>>,
{
    telemetry.metrics.increment_requests(ctx.route);

    let span = telemetry.tracer.open(ctx.route);
    span.set_attribute("http.method", &ctx.method);
    span.set_attribute("http.url", &ctx.url);
    span.set_attribute("user.ip", &ctx.ip);
    span.set_attribute("request.id", &ctx.request_id);

    let result = handler(span.clone()).await;

    let response = match result {
        Ok(handled) => {
            span.set_status(SpanStatus::Ok);
            span.add_event("request completed");
            emit_log(
                LogLevel::Info,
                handled.event,
                &ctx.ip,
                &ctx.request_id,
                &handled.fields,
            );
            handled.response
        }
        Err(error) => {
            if error.marks_span_error() {
                span.set_status(SpanStatus::Error);
                span.add_event(error.to_string());
            }
            match &error {
                AppError::Validation { field } => {
                    emit_log(
                        LogLevel::Warn,
                        "form_validation_failed",
                        &ctx.ip,
                        &ctx.request_id,
                        &[("missing_field", field.to_string())],
                    );
                }
                AppError::NotFound { code } => {
                    emit_log(
                        LogLevel::Warn,
                        "course_not_found",
                        &ctx.ip,
                        &ctx.request_id,
                        &[("course_code", code.clone())],
                    );
                }
                AppError::RouteNotFound { path } => {
                    telemetry.metrics.increment_exceptions();
                    emit_log(
                        LogLevel::Error,
                        "page_not_found",
                        &ctx.ip,
                        &ctx.request_id,
                        &[("path", path.clone())],
                    );
                }
                AppError::Storage(_) | AppError::Internal(_) => {
                    telemetry.metrics.increment_exceptions();
                    emit_log(
                        LogLevel::Error,
                        "request_failed",
                        &ctx.ip,
                        &ctx.request_id,
                        &[
                            ("route", ctx.route.to_string()),
                            ("error", error.to_string()),
                        ],
                    );
                }
            }
            error.into_response()
        }
    };

    let elapsed_ms = ctx.started.elapsed().as_secs_f64() * 1000.0;
    telemetry
        .metrics
        .record_processing_time(ctx.route, elapsed_ms);

    response
}
