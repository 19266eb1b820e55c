//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all catalog and diagnostic routes
//! - Wire up middleware (timeout, request ID, trace layer)
//! - Inject shared state (catalog store, telemetry)
//! - Serve with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::catalog::JsonFileStore;
use crate::config::CatalogConfig;
use crate::http::handlers;
use crate::http::request::{MakeCatalogRequestId, X_REQUEST_ID};
use crate::observability::{spawn_console_exporter, Telemetry};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonFileStore>,
    pub telemetry: Arc<Telemetry>,
}

/// HTTP server for the course catalog.
pub struct CatalogServer {
    router: Router,
    config: CatalogConfig,
    telemetry: Arc<Telemetry>,
}

impl CatalogServer {
    /// Create a new server from validated configuration and telemetry.
    pub fn new(config: CatalogConfig, telemetry: Arc<Telemetry>) -> Self {
        let state = AppState {
            store: Arc::new(JsonFileStore::new(&config.catalog.file_path)),
            telemetry: telemetry.clone(),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            telemetry,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &CatalogConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::index))
            .route("/catalog", get(handlers::course_catalog))
            .route(
                "/add_course",
                get(handlers::add_course_form).post(handlers::add_course_submit),
            )
            .route("/course/{code}", get(handlers::course_details))
            .route("/manual-trace", get(handlers::manual_trace))
            .route("/auto-instrumented", get(handlers::auto_instrumented))
            .fallback(handlers::not_found)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeCatalogRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.listener.request_timeout_secs,
                    ))),
            )
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Shuts down gracefully on Ctrl+C or when the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let interval = self.config.observability.export_interval_secs;
        if interval > 0 {
            spawn_console_exporter(
                self.telemetry.metrics.clone(),
                Duration::from_secs(interval),
            );
        }

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}

/// Wait for Ctrl+C or an explicit shutdown trigger.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if result.is_ok() {
                tracing::info!("Shutdown signal received");
            }
        }
        _ = shutdown.recv() => {
            tracing::info!("Shutdown triggered");
        }
    }
}
