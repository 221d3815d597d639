//! Prediction engine facade.
//!
//! Orchestrates validation, geometry, fare assembly and confidence scoring.
//! The engine holds only its immutable [`FareStructure`], so one instance can
//! be shared freely across threads.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{assemble_fare, round_f64, FareBreakdown, FareInputs, FareStructure};
use super::confidence::{self, ConfidenceInputs};
use super::error::FareError;
use super::geo::TripGeometry;
use super::requests::PredictionRequest;
use super::trip::TripRequest;
use super::validation::validate_trip;

/// Terminal outcome of one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Success,
    Error,
}

/// Full-precision outcome of a successful quote.
#[derive(Debug, Clone, PartialEq)]
pub struct FareQuote {
    pub geometry: TripGeometry,
    pub breakdown: FareBreakdown,
    pub confidence: f64,
}

/// Result returned to callers.
///
/// On failure `predicted_fare` is `None`, `confidence` is 0 and
/// `error_message` is set. A fare is never returned alongside an error.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    #[serde(with = "rust_decimal::serde::float_option")]
    pub predicted_fare: Option<Decimal>,
    pub confidence: f64,
    pub trip_distance_miles: f64,
    pub status: PredictionStatus,
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    pub model_name: &'static str,
    pub model_type: &'static str,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fare_breakdown: Option<FareBreakdown>,
}

impl PredictionResult {
    pub fn is_success(&self) -> bool {
        self.status == PredictionStatus::Success
    }

    /// True when the failure was internal rather than a rejected input.
    pub fn is_computation_failure(&self) -> bool {
        self.error_kind == Some(FareError::COMPUTATION_KIND)
    }

    fn from_quote(quote: FareQuote) -> Self {
        Self {
            predicted_fare: round_f64(quote.breakdown.final_fare, 2),
            confidence: round_display(quote.confidence, 1),
            trip_distance_miles: round_display(quote.geometry.distance_miles, 2),
            status: PredictionStatus::Success,
            error_message: None,
            error_kind: None,
            model_name: PredictionEngine::MODEL_NAME,
            model_type: PredictionEngine::MODEL_TYPE,
            timestamp: Utc::now(),
            fare_breakdown: Some(quote.breakdown),
        }
    }

    /// Error result for `err`.
    pub fn failure(err: &FareError) -> Self {
        Self {
            predicted_fare: None,
            confidence: 0.0,
            trip_distance_miles: 0.0,
            status: PredictionStatus::Error,
            error_message: Some(err.to_string()),
            error_kind: Some(err.kind()),
            model_name: PredictionEngine::MODEL_NAME,
            model_type: PredictionEngine::MODEL_TYPE,
            timestamp: Utc::now(),
            fare_breakdown: None,
        }
    }
}

fn round_display(value: f64, places: u32) -> f64 {
    round_f64(value, places)
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Rule-based NYC taxi fare engine.
#[derive(Debug, Clone, Default)]
pub struct PredictionEngine {
    structure: FareStructure,
}

impl PredictionEngine {
    pub const MODEL_NAME: &'static str = "NYC Taxi Fare Calculator";
    pub const MODEL_TYPE: &'static str = "RuleBasedRegressor";
    pub const VERSION: &'static str = "2.0.0";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn structure(&self) -> &FareStructure {
        &self.structure
    }

    /// Price a parsed trip at full precision.
    pub fn quote(&self, trip: &TripRequest) -> Result<FareQuote, FareError> {
        let distance = validate_trip(trip)?;
        let geometry = TripGeometry::with_distance(distance, &trip.pickup, &trip.dropoff);

        let breakdown = assemble_fare(
            &self.structure,
            &FareInputs {
                distance_miles: geometry.distance_miles,
                time: &trip.pickup_time,
                weather: trip.weather,
                traffic: trip.traffic,
                pickup: &trip.pickup,
                dropoff: &trip.dropoff,
            },
        );

        if !breakdown.final_fare.is_finite() {
            return Err(FareError::Computation(format!(
                "non-finite fare for a {:.2} mile trip",
                geometry.distance_miles
            )));
        }

        let confidence = confidence::score(&ConfidenceInputs {
            distance_miles: geometry.distance_miles,
            fare: breakdown.final_fare,
            time: &trip.pickup_time,
            passenger_count: trip.passenger_count,
            pickup: &trip.pickup,
        });

        tracing::debug!(
            distance_miles = geometry.distance_miles,
            fare = breakdown.final_fare,
            confidence,
            airport = geometry.is_airport_trip,
            "Fare quoted"
        );

        Ok(FareQuote {
            geometry,
            breakdown,
            confidence,
        })
    }

    /// Predict from a parsed trip.
    pub fn predict_trip(&self, trip: &TripRequest) -> PredictionResult {
        match self.quote(trip) {
            Ok(quote) => PredictionResult::from_quote(quote),
            Err(err) => {
                tracing::debug!(kind = err.kind(), "Fare quote rejected: {}", err);
                PredictionResult::failure(&err)
            }
        }
    }

    /// Predict from a raw request. Never panics; every failure becomes an
    /// error result.
    pub fn predict(&self, request: &PredictionRequest) -> PredictionResult {
        match request.to_trip() {
            Ok(trip) => self.predict_trip(&trip),
            Err(err) => {
                tracing::debug!(kind = err.kind(), "Prediction request rejected: {}", err);
                PredictionResult::failure(&err)
            }
        }
    }

    /// Predict each request independently.
    pub fn predict_batch(&self, requests: &[PredictionRequest]) -> Vec<PredictionResult> {
        requests.iter().map(|request| self.predict(request)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(
        dropoff: (f64, f64),
        datetime: &str,
        weather: Option<&str>,
        traffic: Option<&str>,
    ) -> PredictionRequest {
        PredictionRequest {
            pickup_latitude: 40.7589,
            pickup_longitude: -73.9851,
            dropoff_latitude: dropoff.0,
            dropoff_longitude: dropoff.1,
            passenger_count: 2,
            pickup_datetime: datetime.to_string(),
            weather_condition: weather.map(str::to_string),
            traffic_condition: traffic.map(str::to_string),
        }
    }

    const HERALD: (f64, f64) = (40.7505, -73.9934);
    const JFK: (f64, f64) = (40.6413, -73.7781);

    #[test]
    fn test_midtown_afternoon_trip() {
        let engine = PredictionEngine::new();
        let result = engine.predict(&PredictionRequest::sample());

        assert!(result.is_success());
        assert_eq!(result.predicted_fare, Some(dec!(5.54)));
        assert_eq!(result.trip_distance_miles, 0.72);
        assert_eq!(result.confidence, 95.0);
        assert!(result.error_message.is_none());

        let breakdown = result.fare_breakdown.unwrap();
        assert_eq!(breakdown.expected_speed_mph, 25.0);
        assert_eq!(breakdown.surcharges, 0.0);
        assert_eq!(breakdown.weather_multiplier, 1.0);
    }

    #[test]
    fn test_airport_rush_hour_trip() {
        let engine = PredictionEngine::new();
        let rush = engine.predict(&request(JFK, "2024-01-15T08:00:00", None, None));
        let midday = engine.predict(&request(JFK, "2024-01-15T14:00:00", None, None));

        let rush_breakdown = rush.fare_breakdown.clone().unwrap();
        assert_eq!(rush_breakdown.surcharge_items.airport, 5.0);
        assert_eq!(rush_breakdown.expected_speed_mph, 8.0);
        assert!(rush_breakdown.slow_traffic_time_charge > 0.0);

        assert_eq!(rush.predicted_fare, Some(dec!(79.09)));
        assert_eq!(midday.predicted_fare, Some(dec!(55.39)));
        assert!(rush.predicted_fare > midday.predicted_fare);
    }

    #[test]
    fn test_stormy_overnight_multiplies_surcharges() {
        let engine = PredictionEngine::new();
        let result = engine.predict(&request(
            HERALD,
            "2024-01-15T23:30:00",
            Some("stormy"),
            Some("flow"),
        ));

        let breakdown = result.fare_breakdown.clone().unwrap();
        assert_eq!(breakdown.surcharge_items.overnight, 1.0);
        assert_eq!(breakdown.weather_multiplier, 1.2);
        // (3.00 + 0.7245 * 3.50 + 1.00) * 1.20
        assert_eq!(result.predicted_fare, Some(dec!(7.84)));
    }

    #[test]
    fn test_rejections_yield_error_results() {
        let engine = PredictionEngine::new();

        let mut bad_passengers = PredictionRequest::sample();
        bad_passengers.passenger_count = 9;
        let mut bad_latitude = PredictionRequest::sample();
        bad_latitude.pickup_latitude = 91.0;
        let mut same_place = PredictionRequest::sample();
        same_place.dropoff_latitude = same_place.pickup_latitude;
        same_place.dropoff_longitude = same_place.pickup_longitude;

        for req in [bad_passengers, bad_latitude, same_place] {
            let result = engine.predict(&req);
            assert_eq!(result.status, PredictionStatus::Error);
            assert!(result.predicted_fare.is_none());
            assert_eq!(result.confidence, 0.0);
            assert!(result.error_message.is_some());
            assert!(result.fare_breakdown.is_none());
        }
    }

    #[test]
    fn test_quote_errors_are_typed() {
        let engine = PredictionEngine::new();
        let mut trip = PredictionRequest::sample().to_trip().unwrap();
        trip.passenger_count = 0;
        assert_eq!(engine.quote(&trip), Err(FareError::InvalidPassengerCount(0)));
    }

    #[test]
    fn test_computation_failure_result() {
        let result = PredictionResult::failure(&FareError::Computation("non-finite fare".into()));
        assert_eq!(result.status, PredictionStatus::Error);
        assert!(result.predicted_fare.is_none());
        assert_eq!(result.confidence, 0.0);
        assert!(result.fare_breakdown.is_none());
        assert!(result.is_computation_failure());
        assert!(result.error_message.unwrap().contains("non-finite fare"));

        let rejected = PredictionResult::failure(&FareError::IdenticalEndpoints);
        assert!(!rejected.is_computation_failure());
    }

    #[test]
    fn test_predict_is_idempotent() {
        let engine = PredictionEngine::new();
        let req = request(JFK, "2024-01-19T18:15:00", Some("windy"), Some("congested traffic"));
        let first = engine.predict(&req);
        let second = engine.predict(&req);
        assert_eq!(first.predicted_fare, second.predicted_fare);
        assert_eq!(first.trip_distance_miles, second.trip_distance_miles);
        assert_eq!(first.confidence, second.confidence);
    }

    #[test]
    fn test_batch_items_are_isolated() {
        let engine = PredictionEngine::new();
        let mut broken = PredictionRequest::sample();
        broken.weather_condition = Some("blizzard".to_string());
        let results = engine.predict_batch(&[
            PredictionRequest::sample(),
            broken,
            PredictionRequest::sample(),
        ]);

        assert_eq!(results.len(), 3);
        assert!(results[0].is_success());
        assert_eq!(results[1].error_kind, Some("unknown_weather"));
        assert!(results[2].is_success());
        assert_eq!(results[0].predicted_fare, results[2].predicted_fare);
    }

    #[test]
    fn test_result_serializes_as_numbers() {
        let engine = PredictionEngine::new();
        let json = serde_json::to_value(engine.predict(&PredictionRequest::sample())).unwrap();
        assert_eq!(json["predicted_fare"], serde_json::json!(5.54));
        assert_eq!(json["status"], "success");
        assert_eq!(json["model_type"], "RuleBasedRegressor");
        assert!(json["error_message"].is_null());

        let mut bad = PredictionRequest::sample();
        bad.passenger_count = 0;
        let json = serde_json::to_value(engine.predict(&bad)).unwrap();
        assert!(json["predicted_fare"].is_null());
        assert_eq!(json["status"], "error");
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PredictionEngine>();
        assert_send_sync::<PredictionResult>();
    }
}
