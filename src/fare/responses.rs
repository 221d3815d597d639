//! Response DTOs for fare prediction endpoints.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::calculators::FareStructure;
use super::engine::PredictionResult;
use super::requests::PredictionRequest;
use crate::cache::CacheStats;

/// A prediction plus service-side timing
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResponse {
    #[serde(flatten)]
    pub result: PredictionResult,
    /// Milliseconds spent in the service, cache lookup included
    pub prediction_time_ms: f64,
    pub api_version: &'static str,
}

/// Aggregated prediction counters
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsResponse {
    pub prediction_count: u64,
    pub error_count: u64,
    pub success_count: u64,
    pub error_rate_percent: f64,
    pub success_rate_percent: f64,
    pub avg_prediction_time_ms: f64,
    pub total_prediction_time_s: f64,
    pub uptime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStats>,
}

/// Response for the model health check
#[derive(Debug, Clone, Serialize)]
pub struct ModelHealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub prediction_working: bool,
    pub test_prediction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub last_check: DateTime<Utc>,
    pub statistics: StatisticsResponse,
    pub api_version: &'static str,
}

impl ModelHealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Descriptive metrics for a rule-based model
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceMetrics {
    pub accuracy: &'static str,
    pub fare_structure: &'static str,
    pub distance_calculation: &'static str,
    pub confidence_range: &'static str,
}

/// Deployment details attached to model info
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentInfo {
    pub api_version: &'static str,
    pub prediction_count: u64,
    pub error_count: u64,
    pub uptime: String,
}

/// Response for model information
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfoResponse {
    pub model_name: &'static str,
    pub model_type: &'static str,
    pub version: &'static str,
    pub required_features: usize,
    pub feature_names: Vec<&'static str>,
    pub has_feature_processor: bool,
    pub deployment_ready: bool,
    pub performance_metrics: PerformanceMetrics,
    pub fare_structure: FareStructure,
    pub deployment_info: DeploymentInfo,
}

/// Response describing accepted inputs and produced outputs
#[derive(Debug, Clone, Serialize)]
pub struct CapabilitiesResponse {
    pub input_parameters: BTreeMap<&'static str, &'static str>,
    pub output_format: BTreeMap<&'static str, &'static str>,
    pub supported_features: Vec<&'static str>,
    pub constraints: serde_json::Value,
}

/// Example request with the response the engine produces for it
#[derive(Debug, Clone, Serialize)]
pub struct PredictionExampleResponse {
    pub example_request: PredictionRequest,
    pub expected_response: PredictionResult,
}

/// Liveness response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
    pub uptime: String,
}

/// Root endpoint response
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfoResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub health: &'static str,
    pub model_info: String,
}

/// Statistics plus deployment context for the metrics endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MetricsResponse {
    #[serde(flatten)]
    pub statistics: StatisticsResponse,
    pub api_version: &'static str,
    pub environment: &'static str,
    pub timestamp: DateTime<Utc>,
}
