//! Core fare calculation functions.
//!
//! Pure functions for fare math - no I/O, no shared state. All intermediate
//! values stay at full `f64` precision; rounding happens once, in
//! [`round_money`], when a result is assembled.

use chrono::NaiveDateTime;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;

use super::conditions::{Traffic, Weather};
use super::geo::Coordinate;
use super::speed::expected_speed;
use super::surcharges::{calculate_surcharges, SurchargeBreakdown};

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use taxi_fare_api::fare::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Convert a full-precision float to a rounded decimal.
///
/// Uses the exact binary value of `value`, so the result matches rounding the
/// float itself. Returns `None` for NaN and infinities.
pub fn round_f64(value: f64, places: u32) -> Option<Decimal> {
    Decimal::from_f64_retain(value).map(|d| round_money(d, places))
}

/// NYC yellow-cab fare structure (2024 rates).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareStructure {
    pub initial_charge: f64,
    /// Per mile ($0.70 per 1/5 mile).
    pub distance_rate: f64,
    /// Per minute spent below `slow_speed_threshold_mph`.
    pub time_rate: f64,
    pub slow_speed_threshold_mph: f64,
    pub peak_surcharge: f64,
    pub overnight_surcharge: f64,
    pub airport_surcharge: f64,
    pub minimum_fare: f64,
}

impl FareStructure {
    pub const NYC_2024: FareStructure = FareStructure {
        initial_charge: 3.00,
        distance_rate: 3.50,
        time_rate: 0.70,
        slow_speed_threshold_mph: 12.0,
        peak_surcharge: 0.50,
        overnight_surcharge: 1.00,
        airport_surcharge: 5.00,
        minimum_fare: 4.50,
    };
}

impl Default for FareStructure {
    fn default() -> Self {
        Self::NYC_2024
    }
}

/// Fare multiplier for the given weather.
pub fn weather_multiplier(weather: Weather) -> f64 {
    weather.fare_multiplier()
}

/// Estimated trip duration in minutes; zero when `speed_mph` is not positive.
pub fn trip_minutes(distance_miles: f64, speed_mph: f64) -> f64 {
    if speed_mph > 0.0 {
        distance_miles / speed_mph * 60.0
    } else {
        0.0
    }
}

/// Charge for the share of the trip spent below the slow-traffic threshold.
pub fn slow_traffic_charge(structure: &FareStructure, minutes: f64, speed_mph: f64) -> f64 {
    if speed_mph < structure.slow_speed_threshold_mph {
        let slow_fraction = 1.0 - speed_mph / structure.slow_speed_threshold_mph;
        minutes * slow_fraction * structure.time_rate
    } else {
        0.0
    }
}

/// Itemized fare for one trip, at full precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareBreakdown {
    pub initial_charge: f64,
    pub distance_charge: f64,
    pub expected_speed_mph: f64,
    pub trip_minutes: f64,
    pub slow_traffic_time_charge: f64,
    pub surcharges: f64,
    pub surcharge_items: SurchargeBreakdown,
    pub weather_multiplier: f64,
    pub pre_floor_total: f64,
    pub final_fare: f64,
}

impl FareBreakdown {
    pub fn minimum_fare_applied(&self) -> bool {
        self.final_fare > self.pre_floor_total
    }
}

/// Trip inputs the fare depends on.
#[derive(Debug, Clone, Copy)]
pub struct FareInputs<'a> {
    pub distance_miles: f64,
    pub time: &'a NaiveDateTime,
    pub weather: Weather,
    pub traffic: Traffic,
    pub pickup: &'a Coordinate,
    pub dropoff: &'a Coordinate,
}

/// Assemble the fare.
///
/// Order matters: distance and slow-traffic charges and surcharges are added
/// first, the weather multiplier scales that subtotal, and the minimum fare is
/// applied last.
pub fn assemble_fare(structure: &FareStructure, inputs: &FareInputs<'_>) -> FareBreakdown {
    let mut fare = structure.initial_charge;

    let distance_charge = inputs.distance_miles * structure.distance_rate;
    fare += distance_charge;

    let speed = expected_speed(inputs.time, inputs.weather, inputs.traffic);
    let minutes = trip_minutes(inputs.distance_miles, speed);
    let time_charge = slow_traffic_charge(structure, minutes, speed);
    fare += time_charge;

    let surcharge_items = calculate_surcharges(structure, inputs.time, inputs.pickup, inputs.dropoff);
    let surcharges = surcharge_items.total();
    fare += surcharges;

    let multiplier = weather_multiplier(inputs.weather);
    fare *= multiplier;

    let pre_floor_total = fare;
    let final_fare = fare.max(structure.minimum_fare);

    FareBreakdown {
        initial_charge: structure.initial_charge,
        distance_charge,
        expected_speed_mph: speed,
        trip_minutes: minutes,
        slow_traffic_time_charge: time_charge,
        surcharges,
        surcharge_items,
        weather_multiplier: multiplier,
        pre_floor_total,
        final_fare,
    }
}
