//! Course catalog service binary.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use course_catalog::config::{load_config, CatalogConfig};
use course_catalog::http::CatalogServer;
use course_catalog::lifecycle::Shutdown;
use course_catalog::observability::{
    init_logging, init_prometheus, LogSpanExporter, MetricSink, Telemetry, Tracer,
};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "course-catalog", about = "Instrumented course catalog service")]
struct Args {
    /// Path to a TOML configuration file. Defaults are used if omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listener bind address from the config file.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => CatalogConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.observability)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        catalog_file = %config.catalog.file_path,
        request_timeout_secs = config.listener.request_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = init_prometheus(addr) {
                    tracing::error!(error = %e, "Failed to install Prometheus exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let telemetry = Arc::new(Telemetry::new(
        Tracer::new(Arc::new(LogSpanExporter)),
        Arc::new(MetricSink::new()),
    ));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = CatalogServer::new(config, telemetry);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
