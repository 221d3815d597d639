//! In-memory prediction caching using moka
//!
//! Identical trips always price identically, so successful results can be
//! reused for a short TTL. Errors are never cached.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::fare::{PredictionResult, TripRequest};

/// Cache of successful predictions keyed by normalized trip
#[derive(Clone)]
pub struct PredictionCache {
    predictions: Cache<String, Arc<PredictionResult>>,
}

impl PredictionCache {
    /// Create a cache with the given entry TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            predictions: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Cache key for a parsed trip.
    ///
    /// Coordinates are keyed by their exact bit patterns, so only trips with
    /// identical inputs share an entry.
    pub fn trip_key(trip: &TripRequest) -> String {
        format!(
            "{:016x},{:016x}>{:016x},{:016x}|{}|{}|{}|{}",
            trip.pickup.latitude.to_bits(),
            trip.pickup.longitude.to_bits(),
            trip.dropoff.latitude.to_bits(),
            trip.dropoff.longitude.to_bits(),
            trip.passenger_count,
            trip.pickup_time.format("%Y-%m-%dT%H:%M:%S"),
            trip.weather,
            trip.traffic,
        )
    }

    pub async fn get(&self, trip: &TripRequest) -> Option<Arc<PredictionResult>> {
        self.predictions.get(&Self::trip_key(trip)).await
    }

    /// Store a result; error results are ignored.
    pub async fn insert(&self, trip: &TripRequest, result: &PredictionResult) {
        if result.is_success() {
            self.predictions
                .insert(Self::trip_key(trip), Arc::new(result.clone()))
                .await;
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            predictions_size: self.predictions.entry_count(),
        }
    }
}

/// Cache statistics for the metrics endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub predictions_size: u64,
}
