//! Fixed-fee surcharges layered onto the metered fare.

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

use super::calculators::FareStructure;
use super::geo::{self, Coordinate};
use super::speed::is_weekday;

/// Itemized surcharges for one trip. Each line is either zero or its full fee.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SurchargeBreakdown {
    pub peak: f64,
    pub overnight: f64,
    pub airport: f64,
}

impl SurchargeBreakdown {
    pub fn total(&self) -> f64 {
        self.peak + self.overnight + self.airport
    }
}

/// Weekday 16:00-19:59.
pub fn is_peak_hour(time: &NaiveDateTime) -> bool {
    is_weekday(time) && (16..20).contains(&time.hour())
}

/// 20:00-05:59, any day.
pub fn is_overnight(time: &NaiveDateTime) -> bool {
    let hour = time.hour();
    hour >= 20 || hour < 6
}

/// Evaluate every surcharge line independently.
pub fn calculate_surcharges(
    structure: &FareStructure,
    time: &NaiveDateTime,
    pickup: &Coordinate,
    dropoff: &Coordinate,
) -> SurchargeBreakdown {
    let mut breakdown = SurchargeBreakdown::default();

    if is_peak_hour(time) {
        breakdown.peak = structure.peak_surcharge;
    }

    if is_overnight(time) {
        breakdown.overnight = structure.overnight_surcharge;
    }

    // Charged once even when both ends are near (different) airports.
    if geo::is_airport_trip(pickup, dropoff) {
        breakdown.airport = structure.airport_surcharge;
    }

    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const MIDTOWN: Coordinate = Coordinate::new(40.7589, -73.9851);
    const HERALD: Coordinate = Coordinate::new(40.7505, -73.9934);
    const JFK: Coordinate = Coordinate::new(40.6413, -73.7781);
    const LGA: Coordinate = Coordinate::new(40.7769, -73.8740);

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    fn surcharges(time: NaiveDateTime, pickup: Coordinate, dropoff: Coordinate) -> SurchargeBreakdown {
        calculate_surcharges(&FareStructure::default(), &time, &pickup, &dropoff)
    }

    #[test]
    fn test_no_surcharges_midday() {
        assert_eq!(surcharges(at(15, 14), MIDTOWN, HERALD).total(), 0.0);
    }

    #[test]
    fn test_peak_window_weekdays_only() {
        for hour in 16..20 {
            assert_eq!(surcharges(at(15, hour), MIDTOWN, HERALD).peak, 0.50, "hour {hour}");
        }
        assert_eq!(surcharges(at(15, 15), MIDTOWN, HERALD).peak, 0.0);
        assert_eq!(surcharges(at(13, 17), MIDTOWN, HERALD).peak, 0.0);
    }

    #[test]
    fn test_overnight_window() {
        for hour in [20, 21, 23, 0, 3, 5] {
            assert_eq!(surcharges(at(15, hour), MIDTOWN, HERALD).overnight, 1.00, "hour {hour}");
        }
        assert_eq!(surcharges(at(15, 6), MIDTOWN, HERALD).overnight, 0.0);
        assert_eq!(surcharges(at(15, 19), MIDTOWN, HERALD).overnight, 0.0);
    }

    #[test]
    fn test_peak_and_overnight_boundary_at_20() {
        let at_19 = surcharges(at(15, 19), MIDTOWN, HERALD);
        assert_eq!((at_19.peak, at_19.overnight), (0.50, 0.0));
        let at_20 = surcharges(at(15, 20), MIDTOWN, HERALD);
        assert_eq!((at_20.peak, at_20.overnight), (0.0, 1.00));
    }

    #[test]
    fn test_airport_surcharge_once() {
        assert_eq!(surcharges(at(15, 14), MIDTOWN, JFK).airport, 5.00);
        assert_eq!(surcharges(at(15, 14), JFK, MIDTOWN).airport, 5.00);
        assert_eq!(surcharges(at(15, 14), JFK, LGA).total(), 5.00);
    }

    #[test]
    fn test_surcharges_stack() {
        let s = surcharges(at(15, 22), JFK, MIDTOWN);
        assert_eq!(s.total(), 6.00);
    }
}
