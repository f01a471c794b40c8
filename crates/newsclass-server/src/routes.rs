//! HTTP routes and handlers

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use newsclass_classifiers::{HolderStatus, LabelList};
use newsclass_core::{Error, ErrorKind, PredictionInput, PredictionOutput};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{error, info_span, warn};
use uuid::Uuid;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness))
        .route("/labels", get(labels))
        .route("/metrics", get(metrics))
        .route("/prediction", post(prediction))
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness: the process is up, whether or not a model is loaded
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness: 200 once the model is loaded, 503 while degraded
async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<HolderStatus>) {
    let status = state.holder.status();
    let code = if status.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(status))
}

#[derive(Debug, Serialize)]
struct LabelsResponse {
    labels: LabelList,
}

async fn labels(State(state): State<AppState>) -> Result<Json<LabelsResponse>, AppError> {
    let labels = state.holder.labels().ok_or(Error::ModelNotLoaded)?;
    Ok(Json(LabelsResponse { labels }))
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

/// Classify the request text with the shared model
async fn prediction(
    State(state): State<AppState>,
    Json(input): Json<PredictionInput>,
) -> Result<Json<PredictionOutput>, AppError> {
    metrics::counter!("newsclass_requests_total").increment(1);

    let span = info_span!("prediction", request_id = %Uuid::new_v4());
    let holder = Arc::clone(&state.holder);
    let start = Instant::now();

    // Classification is CPU-bound; keep it off the async workers.
    let result = tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        holder.predict(&input.text)
    })
    .await
    .map_err(|e| AppError::Internal(format!("prediction task failed: {e}")))?;

    let outcome = match &result {
        Ok(_) => "success",
        Err(e) => e.kind().as_str(),
    };
    metrics::counter!("newsclass_predictions_total", "outcome" => outcome).increment(1);
    metrics::histogram!("newsclass_prediction_latency_us")
        .record(start.elapsed().as_micros() as f64);

    Ok(Json(PredictionOutput::new(result?)))
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Error handling
#[derive(Debug)]
pub enum AppError {
    Core(Error),
    Internal(String),
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError::Core(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            AppError::Core(err) => {
                let status = match err.kind() {
                    ErrorKind::ModelNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.kind().as_str(), err.to_string())
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
        };

        if status == StatusCode::SERVICE_UNAVAILABLE {
            warn!("Request rejected: {}", message);
        }

        let body = json!({
            "error": {
                "message": message,
                "type": kind,
            }
        });

        (status, Json(body)).into_response()
    }
}
