//! Order Desk Server
//!
//! Serves the order API over an in-memory registry.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin order-desk
//! ```
//!
//! # Environment Variables
//!
//! - `PORT`: HTTP port (default: 3000)
//! - `BIND_ADDRESS`: listen address (default: 0.0.0.0)
//! - `ORDER_DESK_ENV`: development | production (default: development)
//! - `RUST_LOG`: log filter (default: info)

use std::sync::Arc;

use anyhow::Context;
use order_desk::infrastructure::config::{AppConfig, load_dotenv};
use order_desk::infrastructure::http::{AppState, create_router};
use order_desk::infrastructure::persistence::InMemoryOrderRegistry;
use order_desk::infrastructure::telemetry;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config = AppConfig::from_env().context("invalid configuration")?;
    telemetry::init(config.run_mode);

    tracing::info!("Starting Order Desk");
    log_config(&config);

    let registry = Arc::new(InMemoryOrderRegistry::new());
    let app = create_router(AppState::new(registry));

    let addr = config.server.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET    /health");
    tracing::info!("  POST   /api/order");
    tracing::info!("  GET    /api/orders");
    tracing::info!("  DELETE /api/orders");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Order Desk stopped");
    Ok(())
}

/// Log the parsed configuration.
fn log_config(config: &AppConfig) {
    tracing::info!(
        environment = config.run_mode.as_str(),
        bind_address = %config.server.bind_address,
        port = config.server.port,
        "Configuration loaded"
    );
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed; a server that cannot be
/// stopped cleanly should not start.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
