//! Input checks run before any fare computation.

use super::error::{Endpoint, FareError};
use super::geo::{self, Coordinate};
use super::trip::TripRequest;

pub const MIN_PASSENGERS: i64 = 1;
pub const MAX_PASSENGERS: i64 = 8;

/// Trips longer than this are rejected as implausible, in miles.
pub const MAX_TRIP_MILES: f64 = 100.0;

/// Pickup and dropoff closer than this on both axes count as identical, in degrees.
pub const SAME_LOCATION_EPSILON: f64 = 0.0001;

fn check_coordinate(endpoint: Endpoint, point: &Coordinate) -> Result<(), FareError> {
    if !(-90.0..=90.0).contains(&point.latitude) {
        return Err(FareError::InvalidLatitude {
            endpoint,
            value: point.latitude,
        });
    }
    if !(-180.0..=180.0).contains(&point.longitude) {
        return Err(FareError::InvalidLongitude {
            endpoint,
            value: point.longitude,
        });
    }
    Ok(())
}

/// Coordinate and passenger range checks, in that order.
///
/// These run before labels and the pickup time are parsed, so an out-of-range
/// coordinate is reported even when the timestamp is also bad.
pub fn check_ranges(
    pickup: &Coordinate,
    dropoff: &Coordinate,
    passenger_count: i64,
) -> Result<(), FareError> {
    check_coordinate(Endpoint::Pickup, pickup)?;
    check_coordinate(Endpoint::Dropoff, dropoff)?;

    if !(MIN_PASSENGERS..=MAX_PASSENGERS).contains(&passenger_count) {
        return Err(FareError::InvalidPassengerCount(passenger_count));
    }
    Ok(())
}

/// Validate a trip, failing on the first violation.
///
/// Order: pickup coordinate, dropoff coordinate, passenger count, identical
/// endpoints, trip distance. Returns the computed distance so callers do not
/// repeat the haversine.
pub fn validate_trip(trip: &TripRequest) -> Result<f64, FareError> {
    check_ranges(&trip.pickup, &trip.dropoff, trip.passenger_count)?;

    if trip
        .pickup
        .coincides_with(&trip.dropoff, SAME_LOCATION_EPSILON)
    {
        return Err(FareError::IdenticalEndpoints);
    }

    let distance = geo::distance_miles(&trip.pickup, &trip.dropoff);
    if distance > MAX_TRIP_MILES {
        return Err(FareError::TripTooLong(distance));
    }

    Ok(distance)
}
