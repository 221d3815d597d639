//! Plausibility scoring for a computed fare.
//!
//! Independent of the fare calculation itself: flags atypical trips a caller
//! may want to treat with suspicion even when a fare was produced.

use chrono::{NaiveDateTime, Timelike};

use super::geo::{Coordinate, NYC_AREA};

pub const BASE_CONFIDENCE: f64 = 95.0;
pub const MIN_CONFIDENCE: f64 = 75.0;
pub const MAX_CONFIDENCE: f64 = 98.0;

/// Inputs the score depends on.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceInputs<'a> {
    pub distance_miles: f64,
    pub fare: f64,
    pub time: &'a NaiveDateTime,
    /// Not penalized by the rule-based table.
    pub passenger_count: i64,
    pub pickup: &'a Coordinate,
}

/// Score in `[MIN_CONFIDENCE, MAX_CONFIDENCE]`.
///
/// Penalties are subtracted independently and the clamp is applied once at
/// the end.
pub fn score(inputs: &ConfidenceInputs<'_>) -> f64 {
    let mut confidence = BASE_CONFIDENCE;
    let distance = inputs.distance_miles;

    if distance > 50.0 {
        confidence -= 20.0;
    } else if distance > 25.0 {
        confidence -= 10.0;
    }

    if distance < 0.2 {
        confidence -= 15.0;
    }

    if distance > 0.0 {
        let fare_per_mile = inputs.fare / distance;
        if !(3.0..=20.0).contains(&fare_per_mile) {
            confidence -= 10.0;
        }
    }

    let hour = inputs.time.hour();
    if hour < 4 || hour > 23 {
        confidence -= 5.0;
    }

    if !NYC_AREA.contains(inputs.pickup) {
        confidence -= 15.0;
    }

    confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}
