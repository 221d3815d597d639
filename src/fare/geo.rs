//! Great-circle distance and trip geometry.
//!
//! Pure functions over WGS84 coordinates. Distances are in statute miles.

use serde::{Deserialize, Serialize};

/// Earth radius used by the haversine formula, in miles.
pub const EARTH_RADIUS_MILES: f64 = 3956.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Within `epsilon` degrees on both axes.
    pub fn coincides_with(&self, other: &Coordinate, epsilon: f64) -> bool {
        (self.latitude - other.latitude).abs() < epsilon
            && (self.longitude - other.longitude).abs() < epsilon
    }
}

/// A named airport used for surcharge and geometry checks.
#[derive(Debug, Clone, Copy)]
pub struct Airport {
    pub code: &'static str,
    pub location: Coordinate,
}

/// JFK, LGA and EWR.
pub const NYC_AIRPORTS: [Airport; 3] = [
    Airport {
        code: "JFK",
        location: Coordinate::new(40.6413, -73.7781),
    },
    Airport {
        code: "LGA",
        location: Coordinate::new(40.7769, -73.8740),
    },
    Airport {
        code: "EWR",
        location: Coordinate::new(40.6895, -74.1745),
    },
];

/// An endpoint closer than this to an airport makes the trip an airport trip.
pub const AIRPORT_RADIUS_MILES: f64 = 2.0;

/// Axis-aligned lat/lon rectangle, bounds inclusive.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&point.latitude)
            && (self.min_longitude..=self.max_longitude).contains(&point.longitude)
    }
}

/// Greater NYC service area.
pub const NYC_AREA: BoundingBox = BoundingBox {
    min_latitude: 40.4,
    max_latitude: 41.0,
    min_longitude: -74.5,
    max_longitude: -73.5,
};

/// Approximate Manhattan rectangle.
pub const MANHATTAN: BoundingBox = BoundingBox {
    min_latitude: 40.7,
    max_latitude: 40.8,
    min_longitude: -74.0,
    max_longitude: -73.9,
};

/// Haversine great-circle distance in miles.
///
/// Symmetric in its arguments and exactly zero for identical points.
pub fn distance_miles(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = b.longitude.to_radians() - a.longitude.to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();

    c * EARTH_RADIUS_MILES
}

/// Shortest distance from either endpoint to any known airport.
pub fn min_airport_distance(pickup: &Coordinate, dropoff: &Coordinate) -> f64 {
    NYC_AIRPORTS
        .iter()
        .flat_map(|airport| {
            [
                distance_miles(pickup, &airport.location),
                distance_miles(dropoff, &airport.location),
            ]
        })
        .fold(f64::INFINITY, f64::min)
}

/// The airport within [`AIRPORT_RADIUS_MILES`] of either endpoint, if any.
///
/// Airports are checked in [`NYC_AIRPORTS`] order; the first match wins.
pub fn serving_airport(pickup: &Coordinate, dropoff: &Coordinate) -> Option<&'static Airport> {
    NYC_AIRPORTS.iter().find(|airport| {
        distance_miles(pickup, &airport.location) < AIRPORT_RADIUS_MILES
            || distance_miles(dropoff, &airport.location) < AIRPORT_RADIUS_MILES
    })
}

pub fn is_airport_trip(pickup: &Coordinate, dropoff: &Coordinate) -> bool {
    serving_airport(pickup, dropoff).is_some()
}

/// Derived per-trip geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripGeometry {
    pub distance_miles: f64,
    pub is_airport_trip: bool,
    pub is_manhattan: bool,
    pub min_airport_distance_miles: f64,
}

impl TripGeometry {
    pub fn between(pickup: &Coordinate, dropoff: &Coordinate) -> Self {
        Self::with_distance(distance_miles(pickup, dropoff), pickup, dropoff)
    }

    /// Build geometry around an already computed `distance_miles`.
    pub fn with_distance(distance_miles: f64, pickup: &Coordinate, dropoff: &Coordinate) -> Self {
        Self {
            distance_miles,
            is_airport_trip: is_airport_trip(pickup, dropoff),
            is_manhattan: MANHATTAN.contains(pickup) || MANHATTAN.contains(dropoff),
            min_airport_distance_miles: min_airport_distance(pickup, dropoff),
        }
    }
}
