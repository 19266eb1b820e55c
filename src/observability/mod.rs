//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every request produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, processing-time histogram)
//!     → span.rs (one scoped span with attributes, events, status)
//!
//! instrument.rs composes the three around each handler body.
//!
//! Consumers:
//!     → Log aggregation (stderr, file)
//!     → Metrics endpoint (Prometheus scrape) + periodic console snapshot
//!     → Span exporter (structured log sink; pluggable for tests)
//! ```
//!
//! # Design Decisions
//! - Telemetry state is constructed in `main` and injected; no singletons
//!   beyond the `tracing`/`metrics` facades themselves
//! - Every request yields exactly one counter increment, one span, and one
//!   terminal log event, whatever the outcome
//! - Metric updates are cheap (atomic increments)

pub mod instrument;
pub mod logging;
pub mod metrics;
pub mod span;

pub use instrument::{instrument, Handled, RequestContext, Telemetry};
pub use logging::{emit_log, init_logging, LogError, LogLevel};
pub use metrics::{init_prometheus, spawn_console_exporter, MetricSink, MetricsSnapshot};
pub use span::{
    ExportError, FinishedSpan, LogSpanExporter, ScopedSpan, SpanEvent, SpanExporter, SpanStatus,
    Tracer,
};
