//! Startup hook, serving loop and shutdown

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusHandle;
use newsclass_classifiers::ModelHolder;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// Build the model holder and run its one load.
///
/// A failed load leaves the service degraded (readiness reports 503 and
/// predictions fail) unless `require_model` is set, in which case the
/// error is returned and startup aborts.
pub fn init_holder(config: &ServerConfig) -> anyhow::Result<Arc<ModelHolder>> {
    let holder = Arc::new(ModelHolder::new(config.resolved_artifact_path()));

    match holder.load() {
        Ok(()) => {
            metrics::counter!("newsclass_load_attempts_total", "outcome" => "success").increment(1);
        }
        Err(e) => {
            metrics::counter!("newsclass_load_attempts_total", "outcome" => "failure").increment(1);
            if config.require_model {
                return Err(e).context("model is required but could not be loaded");
            }
            warn!("Starting without a model; predictions will fail until the service is restarted with a valid artifact");
        }
    }

    Ok(holder)
}

/// Load the model, then serve until a shutdown signal arrives
pub async fn run_server(
    config: ServerConfig,
    metrics_handle: Option<PrometheusHandle>,
) -> anyhow::Result<()> {
    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.bind_address()))?;

    // The model is loaded before the listener exists, so no request can race it.
    let holder = init_holder(&config)?;

    let mut state = AppState::new(config, holder);
    if let Some(handle) = metrics_handle {
        state = state.with_metrics(handle);
    }
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    warn!("Shutdown signal received, stopping server...");
}
