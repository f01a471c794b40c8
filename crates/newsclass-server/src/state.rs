//! Application state shared by all request handlers

use metrics_exporter_prometheus::PrometheusHandle;
use newsclass_classifiers::ModelHolder;
use std::sync::Arc;

use crate::config::ServerConfig;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// The single model holder of the process
    pub holder: Arc<ModelHolder>,

    /// Prometheus handle for rendering, absent when no recorder is installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: ServerConfig, holder: Arc<ModelHolder>) -> Self {
        Self {
            config: Arc::new(config),
            holder,
            metrics_handle: None,
        }
    }

    /// Attach the metrics handle served at `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}
