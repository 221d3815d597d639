//! Fare service: the caller-side wrapper around the prediction engine.
//!
//! The engine stays pure. Counters, timing, caching and health reporting live
//! here and observe each call from the outside.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use rust_decimal::prelude::*;
use serde_json::json;
use tracing::{error, info, warn};

use crate::cache::PredictionCache;
use crate::config::Settings;

use super::engine::{PredictionEngine, PredictionResult};
use super::requests::PredictionRequest;
use super::responses::{
    CapabilitiesResponse, DeploymentInfo, ModelHealthResponse, ModelInfoResponse,
    PerformanceMetrics, PredictionExampleResponse, PredictionResponse, StatisticsResponse,
};
use super::validation::{MAX_PASSENGERS, MAX_TRIP_MILES, MIN_PASSENGERS};

pub const API_VERSION: &str = "1.0.0";

/// Prediction counters, updated without locks
#[derive(Debug)]
pub struct PredictionStats {
    prediction_count: AtomicU64,
    error_count: AtomicU64,
    total_prediction_micros: AtomicU64,
    started_at: Instant,
}

impl PredictionStats {
    pub fn new() -> Self {
        Self {
            prediction_count: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
            total_prediction_micros: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    /// Record one finished prediction
    pub fn record(&self, elapsed: Duration, success: bool) {
        self.prediction_count.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.total_prediction_micros
            .fetch_add(micros, Ordering::Relaxed);
    }

    pub fn prediction_count(&self) -> u64 {
        self.prediction_count.load(Ordering::Relaxed)
    }

    pub fn error_count(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Point-in-time view of the counters
    pub fn snapshot(&self) -> StatisticsResponse {
        let count = self.prediction_count();
        let errors = self.error_count().min(count);
        let total_micros = self.total_prediction_micros.load(Ordering::Relaxed);

        let (error_rate, avg_ms) = if count > 0 {
            (
                errors as f64 / count as f64 * 100.0,
                total_micros as f64 / count as f64 / 1000.0,
            )
        } else {
            (0.0, 0.0)
        };

        StatisticsResponse {
            prediction_count: count,
            error_count: errors,
            success_count: count - errors,
            error_rate_percent: round2(error_rate),
            success_rate_percent: round2(100.0 - error_rate),
            avg_prediction_time_ms: round2(avg_ms),
            total_prediction_time_s: (total_micros as f64 / 1_000_000.0 * 1000.0).round() / 1000.0,
            uptime: format_uptime(self.uptime()),
            cache: None,
        }
    }
}

impl Default for PredictionStats {
    fn default() -> Self {
        Self::new()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a duration as HH:MM:SS
pub fn format_uptime(uptime: Duration) -> String {
    let seconds = uptime.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Shared fare service handle
#[derive(Clone)]
pub struct FareService {
    engine: Arc<PredictionEngine>,
    stats: Arc<PredictionStats>,
    cache: Option<PredictionCache>,
    max_batch_size: usize,
}

impl FareService {
    pub fn new(engine: PredictionEngine, settings: &Settings) -> Self {
        let cache = settings
            .cache_predictions
            .then(|| PredictionCache::new(settings.cache_ttl));

        info!(
            model = PredictionEngine::MODEL_NAME,
            cache_enabled = cache.is_some(),
            "Fare service initialized"
        );

        Self {
            engine: Arc::new(engine),
            stats: Arc::new(PredictionStats::new()),
            cache,
            max_batch_size: settings.max_batch_size,
        }
    }

    pub fn engine(&self) -> &PredictionEngine {
        &self.engine
    }

    pub fn stats(&self) -> &PredictionStats {
        &self.stats
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Predict one trip, recording statistics.
    pub async fn predict(&self, request: &PredictionRequest) -> PredictionResponse {
        let start = Instant::now();

        let result = match request.to_trip() {
            Ok(trip) => match &self.cache {
                Some(cache) => match cache.get(&trip).await {
                    Some(hit) => {
                        tracing::debug!("Cache HIT for trip prediction");
                        let mut result = (*hit).clone();
                        result.timestamp = Utc::now();
                        result
                    }
                    None => {
                        let result = self.engine.predict_trip(&trip);
                        cache.insert(&trip, &result).await;
                        result
                    }
                },
                None => self.engine.predict_trip(&trip),
            },
            Err(err) => PredictionResult::failure(&err),
        };

        let elapsed = start.elapsed();
        self.stats.record(elapsed, result.is_success());
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;

        match (&result.predicted_fare, &result.error_message) {
            (Some(fare), _) => info!(
                "Prediction successful: ${} (confidence: {:.1}%) in {:.1}ms",
                fare, result.confidence, elapsed_ms
            ),
            (None, message) => {
                let message = message.as_deref().unwrap_or("Unknown error");
                if result.is_computation_failure() {
                    error!("Prediction failed: {}", message);
                } else {
                    warn!("Prediction rejected: {}", message);
                }
            }
        }

        PredictionResponse {
            result,
            prediction_time_ms: round2(elapsed_ms),
            api_version: API_VERSION,
        }
    }

    /// Predict each trip independently; one failure never affects another.
    pub async fn predict_batch(&self, requests: &[PredictionRequest]) -> Vec<PredictionResponse> {
        let mut responses = Vec::with_capacity(requests.len());
        for (i, request) in requests.iter().enumerate() {
            let response = self.predict(request).await;
            if !response.result.is_success() {
                warn!("Batch prediction item {} failed", i);
            }
            responses.push(response);
        }
        info!("Batch prediction completed: {} results", responses.len());
        responses
    }

    /// Current statistics, including cache size when caching is on
    pub fn statistics(&self) -> StatisticsResponse {
        let mut snapshot = self.stats.snapshot();
        snapshot.cache = self.cache.as_ref().map(PredictionCache::stats);
        snapshot
    }

    /// Price the sample trip and report whether the engine works.
    pub fn health_check(&self) -> ModelHealthResponse {
        let result = self.engine.predict(&PredictionRequest::sample());
        let working = result.is_success();

        if working {
            info!("Health check passed");
        } else {
            warn!("Health check failed: {:?}", result.error_message);
        }

        ModelHealthResponse {
            status: if working { "healthy" } else { "unhealthy" },
            model_loaded: true,
            prediction_working: working,
            test_prediction: result.predicted_fare.and_then(|fare| fare.to_f64()),
            error: result.error_message,
            last_check: Utc::now(),
            statistics: self.statistics(),
            api_version: API_VERSION,
        }
    }

    pub fn model_info(&self) -> ModelInfoResponse {
        ModelInfoResponse {
            model_name: PredictionEngine::MODEL_NAME,
            model_type: PredictionEngine::MODEL_TYPE,
            version: PredictionEngine::VERSION,
            required_features: FEATURE_NAMES.len(),
            feature_names: FEATURE_NAMES.to_vec(),
            has_feature_processor: false,
            deployment_ready: true,
            performance_metrics: PerformanceMetrics {
                accuracy: "Rule-based calculation",
                fare_structure: "NYC 2024 official rates",
                distance_calculation: "Haversine formula",
                confidence_range: "75-98%",
            },
            fare_structure: self.engine.structure().clone(),
            deployment_info: DeploymentInfo {
                api_version: API_VERSION,
                prediction_count: self.stats.prediction_count(),
                error_count: self.stats.error_count(),
                uptime: format_uptime(self.stats.uptime()),
            },
        }
    }

    /// The sample request together with its actual engine result
    pub fn example(&self) -> PredictionExampleResponse {
        let request = PredictionRequest::sample();
        let expected_response = self.engine.predict(&request);
        PredictionExampleResponse {
            example_request: request,
            expected_response,
        }
    }
}

const FEATURE_NAMES: [&str; 8] = [
    "pickup_latitude",
    "pickup_longitude",
    "dropoff_latitude",
    "dropoff_longitude",
    "passenger_count",
    "pickup_datetime",
    "weather_condition",
    "traffic_condition",
];

/// Static description of inputs, outputs and limits
pub fn capabilities(max_batch_size: usize) -> CapabilitiesResponse {
    let input_parameters = BTreeMap::from([
        ("pickup_latitude", "float (-90 to 90) - Pickup location latitude"),
        ("pickup_longitude", "float (-180 to 180) - Pickup location longitude"),
        ("dropoff_latitude", "float (-90 to 90) - Dropoff location latitude"),
        ("dropoff_longitude", "float (-180 to 180) - Dropoff location longitude"),
        ("passenger_count", "int (1 to 8) - Number of passengers"),
        ("pickup_datetime", "string (ISO 8601) - Trip start time"),
        ("weather_condition", "string (optional) - sunny, cloudy, windy, stormy"),
        ("traffic_condition", "string (optional) - flow traffic, congested traffic"),
    ]);

    let output_format = BTreeMap::from([
        ("predicted_fare", "float - Predicted fare in USD, null on error"),
        ("confidence", "float (0-100) - Plausibility score"),
        ("trip_distance_miles", "float - Great-circle trip distance"),
        ("status", "string - success or error"),
        ("error_message", "string (optional) - Error details if failed"),
        ("model_name", "string - Engine name"),
        ("model_type", "string - Engine type"),
        ("timestamp", "string - ISO timestamp of prediction"),
        ("fare_breakdown", "object (optional) - Itemized fare"),
        ("prediction_time_ms", "float - Processing time in milliseconds"),
        ("api_version", "string - API version used"),
    ]);

    CapabilitiesResponse {
        input_parameters,
        output_format,
        supported_features: vec![
            "Haversine distance calculation",
            "Confidence scoring",
            "Weather condition adjustment",
            "Traffic condition adjustment",
            "Rush hour speed modelling",
            "Peak and overnight surcharges",
            "Airport trip detection",
            "Minimum fare floor",
            "Batch prediction",
        ],
        constraints: json!({
            "coordinate_bounds": {
                "latitude": {"min": -90, "max": 90},
                "longitude": {"min": -180, "max": 180}
            },
            "passenger_limits": {"min": MIN_PASSENGERS, "max": MAX_PASSENGERS},
            "maximum_trip_distance_miles": MAX_TRIP_MILES,
            "datetime_format": "ISO 8601 (e.g., '2024-01-15T14:30:00')",
            "weather_options": ["sunny", "cloudy", "windy", "stormy"],
            "traffic_options": ["flow traffic", "congested traffic"],
            "max_batch_size": max_batch_size,
        }),
    }
}
