//! Typed trip input and timestamp parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::conditions::{Traffic, Weather};
use super::error::FareError;
use super::geo::Coordinate;

/// A fully parsed trip, ready for pricing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRequest {
    pub pickup: Coordinate,
    pub dropoff: Coordinate,
    pub passenger_count: i64,
    /// Wall-clock pickup time; no timezone conversion is applied.
    pub pickup_time: NaiveDateTime,
    pub weather: Weather,
    pub traffic: Traffic,
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 pickup time into wall-clock time.
///
/// Offsets and `Z` are accepted but only the local wall-clock part is kept.
/// A bare date means midnight.
pub fn parse_pickup_time(raw: &str) -> Result<NaiveDateTime, FareError> {
    let value = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }

    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Ok(dt);
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| FareError::InvalidTimestamp(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_iso_local() {
        let dt = parse_pickup_time("2024-01-15T14:30:00").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (14, 30));
        assert_eq!(dt.month(), 1);
    }

    #[test]
    fn test_parse_space_separator_and_fraction() {
        let dt = parse_pickup_time("2024-01-15 08:05:09.250").unwrap();
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (8, 5, 9));
    }

    #[test]
    fn test_parse_keeps_wall_clock_for_offsets() {
        let dt = parse_pickup_time("2024-01-15T23:30:00-05:00").unwrap();
        assert_eq!(dt.hour(), 23);
        let dt = parse_pickup_time("2024-01-15T23:30:00Z").unwrap();
        assert_eq!(dt.hour(), 23);
    }

    #[test]
    fn test_parse_minutes_only_and_bare_date() {
        assert_eq!(parse_pickup_time("2024-01-15T07:45").unwrap().minute(), 45);
        let midnight = parse_pickup_time("2024-01-15").unwrap();
        assert_eq!((midnight.hour(), midnight.day()), (0, 15));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["", "yesterday", "2024-13-01T10:00:00", "15/01/2024 10:00"] {
            assert_eq!(
                parse_pickup_time(raw),
                Err(FareError::InvalidTimestamp(raw.to_string()))
            );
        }
    }
}
