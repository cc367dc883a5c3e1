//! HTTP routes and handlers

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use newsclf_core::{Error, PredictRequest, PredictResponse};
use newsclf_telemetry::LogRecord;
use serde_json::{json, Value};
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::state::ServiceState;

pub fn create_router(state: ServiceState) -> Router {
    let mut router = Router::new()
        .route("/", get(read_root))
        .route("/predict", post(predict));

    if state.config.metrics.enabled {
        router = router.route("/metrics", get(metrics));
    }

    router
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn read_root() -> Json<Value> {
    Json(json!({"Hello": "World"}))
}

async fn metrics(State(state): State<ServiceState>) -> String {
    match &state.prometheus {
        Some(handle) => handle.render(),
        None => state.metrics.snapshot().render_text(),
    }
}

/// Classify one article and log the outcome.
///
/// The body is parsed as JSON whatever its content type, so raw lines posted
/// by the replay driver are accepted.
async fn predict(
    State(state): State<ServiceState>,
    body: Bytes,
) -> Result<Json<PredictResponse>, AppError> {
    // Inference and the flushed log write are both blocking.
    let worker_state = state.clone();
    let outcome = tokio::task::spawn_blocking(move || serve_prediction(&worker_state, &body))
        .await
        .map_err(|e| Error::internal(format!("prediction task failed: {e}")))
        .and_then(|result| result);

    match outcome {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            if err.is_client_error() {
                warn!("Rejected prediction request: {}", err);
                state.metrics.record_rejected();
            } else {
                error!("Prediction failed: {}", err);
                state.metrics.record_failed(error_kind(&err));
            }
            Err(AppError(err))
        }
    }
}

fn serve_prediction(state: &ServiceState, body: &[u8]) -> newsclf_core::Result<PredictResponse> {
    let request = PredictRequest::from_json_slice(body)?;
    debug!("Validated request: {:?}", request.title);

    let received_at = Local::now();
    let start = Instant::now();

    let label = state.classifier.predict_label(&request)?;
    let scores = state.classifier.predict_proba(&request)?;

    let latency = start.elapsed();
    let record = LogRecord::new(received_at, request, scores.clone(), latency);
    state.request_log.append(&record)?;
    state.metrics.record_served(latency);

    let response = PredictResponse::new(scores, label);
    info!(
        "Predicted '{}' ({:.3}) in {:.3}ms",
        response.label,
        response.confidence().unwrap_or_default(),
        record.latency
    );
    Ok(response)
}

fn error_kind(err: &Error) -> &'static str {
    match err {
        Error::Validation(_) => "validation",
        Error::Inference(_) => "inference",
        Error::Logging(_) | Error::Io(_) => "logging",
        _ => "internal",
    }
}

async fn fallback() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({"detail": "Not Found"})))
}

/// Error handling
#[derive(Debug)]
struct AppError(Error);

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = json!({
            "error": {
                "message": self.0.to_string(),
                "type": format!("{}_error", error_kind(&self.0)),
            }
        });

        (status, Json(body)).into_response()
    }
}
