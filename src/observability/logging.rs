//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Emit per-request structured log events with correlation fields
//!
//! # Design Decisions
//! - JSON format for production, pretty format for development
//! - Log level configurable via config file (EnvFilter syntax)
//! - Optional file output; standard output otherwise
//! - `emit_log` is infallible: a log event that cannot be written is dropped
//!   by the subscriber, never surfaced to the request

use std::fs::File;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Errors that can occur during logging initialization.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("Failed to open log file: {0}")]
    FileOpen(String),

    #[error("Subscriber already initialized")]
    AlreadyInitialized,
}

/// Initialize the tracing subscriber from the observability config.
///
/// This should be called once at application startup.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), LogError> {
    let filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| LogError::InvalidFilter(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(filter);

    match (config.log_format, config.log_file.is_empty()) {
        (LogFormat::Json, true) => registry
            .with(fmt::layer().json())
            .try_init()
            .map_err(|_| LogError::AlreadyInitialized),
        (LogFormat::Json, false) => {
            let file = File::create(&config.log_file)
                .map_err(|e| LogError::FileOpen(e.to_string()))?;
            registry
                .with(fmt::layer().json().with_writer(Mutex::new(file)))
                .try_init()
                .map_err(|_| LogError::AlreadyInitialized)
        }
        (LogFormat::Pretty, true) => registry
            .with(fmt::layer())
            .try_init()
            .map_err(|_| LogError::AlreadyInitialized),
        (LogFormat::Pretty, false) => {
            let file = File::create(&config.log_file)
                .map_err(|e| LogError::FileOpen(e.to_string()))?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()
                .map_err(|_| LogError::AlreadyInitialized)
        }
    }
}

/// Severity of an emitted log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Emit a structured log event correlated to a request.
///
/// Extra context fields are rendered as a JSON object so arbitrary
/// key/value pairs survive without a fixed schema per call site.
pub fn emit_log(
    level: LogLevel,
    event: &str,
    user_ip: &str,
    request_id: &str,
    fields: &[(&str, String)],
) {
    let context = serde_json::Value::Object(
        fields
            .iter()
            .map(|(k, v)| ((*k).to_string(), serde_json::Value::String(v.clone())))
            .collect(),
    );

    match level {
        LogLevel::Info => tracing::info!(
            target: "course_catalog::event",
            event = event,
            user_ip = user_ip,
            request_id = request_id,
            context = %context,
        ),
        LogLevel::Warn => tracing::warn!(
            target: "course_catalog::event",
            event = event,
            user_ip = user_ip,
            request_id = request_id,
            context = %context,
        ),
        LogLevel::Error => tracing::error!(
            target: "course_catalog::event",
            event = event,
            user_ip = user_ip,
            request_id = request_id,
            context = %context,
        ),
    }
}
