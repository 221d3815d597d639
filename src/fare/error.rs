//! Fare engine error types

use std::fmt;

use thiserror::Error;

/// Which end of the trip a coordinate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Pickup,
    Dropoff,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Pickup => f.write_str("pickup"),
            Endpoint::Dropoff => f.write_str("dropoff"),
        }
    }
}

/// Everything that can stop a fare quote.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FareError {
    #[error("Invalid {endpoint} latitude: {value} (must be -90 to 90)")]
    InvalidLatitude { endpoint: Endpoint, value: f64 },

    #[error("Invalid {endpoint} longitude: {value} (must be -180 to 180)")]
    InvalidLongitude { endpoint: Endpoint, value: f64 },

    #[error("Invalid passenger count: {0} (must be 1-8)")]
    InvalidPassengerCount(i64),

    #[error("Pickup and dropoff locations cannot be the same")]
    IdenticalEndpoints,

    #[error("Trip distance too long: {0:.1} miles")]
    TripTooLong(f64),

    #[error("Unknown weather condition '{0}' (must be one of: sunny, cloudy, windy, stormy)")]
    UnknownWeather(String),

    #[error("Unknown traffic condition '{0}' (must be one of: flow traffic, congested traffic)")]
    UnknownTraffic(String),

    #[error("Invalid datetime format '{0}'. Use ISO format (e.g., '2024-01-15T14:30:00')")]
    InvalidTimestamp(String),

    #[error("Fare computation failed: {0}")]
    Computation(String),
}

impl FareError {
    pub const COMPUTATION_KIND: &'static str = "computation_error";

    /// Caller-correctable input problems, as opposed to internal failures.
    pub fn is_validation(&self) -> bool {
        !matches!(self, FareError::Computation(_))
    }

    /// Short machine-readable tag for the failure reason.
    pub fn kind(&self) -> &'static str {
        match self {
            FareError::InvalidLatitude { .. } => "invalid_latitude",
            FareError::InvalidLongitude { .. } => "invalid_longitude",
            FareError::InvalidPassengerCount(_) => "invalid_passenger_count",
            FareError::IdenticalEndpoints => "identical_endpoints",
            FareError::TripTooLong(_) => "trip_too_long",
            FareError::UnknownWeather(_) => "unknown_weather",
            FareError::UnknownTraffic(_) => "unknown_traffic",
            FareError::InvalidTimestamp(_) => "invalid_timestamp",
            FareError::Computation(_) => Self::COMPUTATION_KIND,
        }
    }
}
