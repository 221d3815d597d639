//! Request DTOs for fare prediction endpoints.

use serde::{Deserialize, Serialize};

use super::conditions::{Traffic, Weather};
use super::error::FareError;
use super::geo::Coordinate;
use super::trip::{parse_pickup_time, TripRequest};
use super::validation::check_ranges;

/// Raw prediction request, as received from a caller.
///
/// Labels and the pickup time stay strings here; [`PredictionRequest::to_trip`]
/// turns them into typed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub pickup_latitude: f64,
    pub pickup_longitude: f64,
    pub dropoff_latitude: f64,
    pub dropoff_longitude: f64,
    pub passenger_count: i64,
    pub pickup_datetime: String,
    #[serde(default)]
    pub weather_condition: Option<String>,
    #[serde(default)]
    pub traffic_condition: Option<String>,
}

impl PredictionRequest {
    /// Range-check coordinates and passengers, then parse labels and the
    /// pickup time.
    pub fn to_trip(&self) -> Result<TripRequest, FareError> {
        let pickup = Coordinate::new(self.pickup_latitude, self.pickup_longitude);
        let dropoff = Coordinate::new(self.dropoff_latitude, self.dropoff_longitude);
        check_ranges(&pickup, &dropoff, self.passenger_count)?;

        let weather = match self.weather_condition.as_deref() {
            Some(label) => label.parse()?,
            None => Weather::default(),
        };
        let traffic = match self.traffic_condition.as_deref() {
            Some(label) => label.parse()?,
            None => Traffic::default(),
        };

        Ok(TripRequest {
            pickup,
            dropoff,
            passenger_count: self.passenger_count,
            pickup_time: parse_pickup_time(&self.pickup_datetime)?,
            weather,
            traffic,
        })
    }

    /// The request used for health checks and API examples.
    pub fn sample() -> Self {
        Self {
            pickup_latitude: 40.7589,
            pickup_longitude: -73.9851,
            dropoff_latitude: 40.7505,
            dropoff_longitude: -73.9934,
            passenger_count: 2,
            pickup_datetime: "2024-01-15T14:30:00".to_string(),
            weather_condition: Some("sunny".to_string()),
            traffic_condition: Some("flow traffic".to_string()),
        }
    }
}

/// Request to predict several trips at once
#[derive(Debug, Deserialize)]
pub struct BatchPredictionRequest {
    pub predictions: Vec<PredictionRequest>,
}
