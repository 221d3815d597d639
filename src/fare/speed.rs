//! Expected average travel speed.
//!
//! A deterministic simulation input for slow-traffic time billing, not a
//! measurement.

use chrono::{Datelike, NaiveDateTime, Timelike};

use super::conditions::{Traffic, Weather};

/// Cap applied during weekday rush hours, in mph.
pub const RUSH_HOUR_SPEED_MPH: f64 = 8.0;

/// No estimate drops below this, in mph.
pub const MIN_SPEED_MPH: f64 = 5.0;

/// Monday through Friday.
pub fn is_weekday(time: &NaiveDateTime) -> bool {
    time.weekday().num_days_from_monday() < 5
}

/// Weekday 07:00-09:59 or 17:00-19:59.
pub fn is_rush_hour(time: &NaiveDateTime) -> bool {
    let hour = time.hour();
    is_weekday(time) && ((7..=9).contains(&hour) || (17..=19).contains(&hour))
}

/// Expected average speed in mph, never below [`MIN_SPEED_MPH`].
pub fn expected_speed(time: &NaiveDateTime, weather: Weather, traffic: Traffic) -> f64 {
    let mut speed = traffic.base_speed_mph();

    if is_rush_hour(time) {
        speed = speed.min(RUSH_HOUR_SPEED_MPH);
    }

    speed *= weather.speed_factor();

    speed.max(MIN_SPEED_MPH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // 2024-01-15 is a Monday, 2024-01-13 a Saturday.
    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_free_flow_midday() {
        assert_eq!(expected_speed(&at(15, 14, 30), Weather::Sunny, Traffic::Flow), 25.0);
    }

    #[test]
    fn test_congested_midday() {
        assert_eq!(
            expected_speed(&at(15, 14, 30), Weather::Sunny, Traffic::Congested),
            12.0
        );
    }

    #[test]
    fn test_rush_hour_cap_on_weekdays() {
        for hour in [7, 8, 9, 17, 18, 19] {
            assert_eq!(
                expected_speed(&at(15, hour, 59), Weather::Sunny, Traffic::Flow),
                8.0,
                "hour {hour}"
            );
        }
        for hour in [6, 10, 16, 20] {
            assert_eq!(
                expected_speed(&at(15, hour, 0), Weather::Sunny, Traffic::Flow),
                25.0,
                "hour {hour}"
            );
        }
    }

    #[test]
    fn test_no_rush_hour_on_weekends() {
        assert_eq!(expected_speed(&at(13, 8, 0), Weather::Sunny, Traffic::Flow), 25.0);
        assert!(!is_weekday(&at(14, 8, 0)));
    }

    #[test]
    fn test_weather_derating() {
        let t = at(15, 14, 0);
        assert_eq!(expected_speed(&t, Weather::Stormy, Traffic::Flow), 20.0);
        assert_eq!(expected_speed(&t, Weather::Windy, Traffic::Flow), 20.0);
        assert!((expected_speed(&t, Weather::Cloudy, Traffic::Flow) - 23.75).abs() < 1e-9);
        assert!((expected_speed(&t, Weather::Cloudy, Traffic::Congested) - 11.4).abs() < 1e-9);
    }

    #[test]
    fn test_rush_hour_then_weather() {
        let t = at(15, 8, 0);
        assert!((expected_speed(&t, Weather::Stormy, Traffic::Congested) - 6.4).abs() < 1e-9);
    }

    #[test]
    fn test_speed_never_below_floor() {
        for weather in Weather::ALL {
            for traffic in Traffic::ALL {
                for hour in 0..24 {
                    assert!(expected_speed(&at(15, hour, 0), weather, traffic) >= MIN_SPEED_MPH);
                }
            }
        }
    }
}
