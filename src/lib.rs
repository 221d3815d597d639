//! NYC taxi fare prediction service
//!
//! A rule-based fare engine (`fare`) behind a small axum API.

pub mod cache;
pub mod config;
pub mod error;
pub mod fare;

use std::sync::Arc;

use axum::{http::HeaderValue, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Settings;
use crate::fare::{FareService, PredictionEngine};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: FareService,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let service = FareService::new(PredictionEngine::new(), &settings);
        Self {
            service,
            settings: Arc::new(settings),
        }
    }
}

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.settings);
    let timeout = state.settings.max_prediction_time;

    Router::new()
        .merge(fare::routes::service_router())
        .nest(&state.settings.api_prefix, fare::router())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if settings.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = settings
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
