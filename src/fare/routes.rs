//! Fare prediction route handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use crate::error::{AppError, Result};
use crate::AppState;

use super::requests::{BatchPredictionRequest, PredictionRequest};
use super::responses::{
    CapabilitiesResponse, HealthResponse, MetricsResponse, ModelHealthResponse, ModelInfoResponse,
    PredictionExampleResponse, PredictionResponse, ServiceInfoResponse,
};
use super::services::{self, format_uptime, API_VERSION};

/// Routes mounted under the API prefix
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/predict", post(predict))
        .route("/predict/batch", post(predict_batch))
        .route("/predict/example", get(example))
        .route("/model/info", get(model_info))
        .route("/model/capabilities", get(capabilities))
}

/// Routes mounted at the root
pub fn service_router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/ping", get(ping))
        .route("/health", get(health))
        .route("/health/model", get(model_health))
        .route("/metrics", get(metrics))
}

/// Single prediction: 422 for rejected input, 500 for internal failures
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> Response {
    prediction_reply(state.service.predict(&request).await)
}

fn prediction_reply(response: PredictionResponse) -> Response {
    let status = if response.result.is_success() {
        StatusCode::OK
    } else if response.result.is_computation_failure() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };

    (status, Json(response)).into_response()
}

/// Batch prediction; failed items are reported inline
pub async fn predict_batch(
    State(state): State<AppState>,
    Json(batch): Json<BatchPredictionRequest>,
) -> Result<Json<Vec<PredictionResponse>>> {
    let max = state.service.max_batch_size();
    if batch.predictions.len() > max {
        return Err(AppError::BadRequest(format!(
            "Maximum {} predictions per batch request",
            max
        )));
    }

    tracing::info!("Processing batch of {} predictions", batch.predictions.len());
    Ok(Json(state.service.predict_batch(&batch.predictions).await))
}

pub async fn example(State(state): State<AppState>) -> Json<PredictionExampleResponse> {
    Json(state.service.example())
}

pub async fn model_info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    Json(state.service.model_info())
}

pub async fn capabilities(State(state): State<AppState>) -> Json<CapabilitiesResponse> {
    Json(services::capabilities(state.service.max_batch_size()))
}

pub async fn root(State(state): State<AppState>) -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        message: "NYC Taxi Fare Prediction API",
        version: crate::VERSION,
        status: "running",
        timestamp: Utc::now(),
        health: "/health",
        model_info: format!("{}/model/info", state.settings.api_prefix),
    })
}

pub async fn ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        version: crate::VERSION,
        uptime: format_uptime(state.service.stats().uptime()),
    })
}

/// Model health; 503 when the sample trip cannot be priced
pub async fn model_health(State(state): State<AppState>) -> Result<Json<ModelHealthResponse>> {
    let health = state.service.health_check();
    if !health.is_healthy() {
        return Err(AppError::Unavailable(format!(
            "Model health check failed: {}",
            health.error.as_deref().unwrap_or("sample prediction failed")
        )));
    }
    Ok(Json(health))
}

pub async fn metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        statistics: state.service.statistics(),
        api_version: API_VERSION,
        environment: state.settings.environment.as_str(),
        timestamp: Utc::now(),
    })
}
