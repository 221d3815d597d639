//! Weather and traffic labels.
//!
//! Free-text labels become closed enums at the boundary. Per-label factors are
//! lookup tables on the enum so the rule set can be audited in one place.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::FareError;

/// Weather at pickup time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    #[default]
    Sunny,
    Cloudy,
    Windy,
    Stormy,
}

impl Weather {
    pub const ALL: [Weather; 4] = [
        Weather::Sunny,
        Weather::Cloudy,
        Weather::Windy,
        Weather::Stormy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Weather::Sunny => "sunny",
            Weather::Cloudy => "cloudy",
            Weather::Windy => "windy",
            Weather::Stormy => "stormy",
        }
    }

    /// Multiplier applied to the surcharge-inclusive fare subtotal.
    pub fn fare_multiplier(self) -> f64 {
        match self {
            Weather::Sunny => 1.00,
            Weather::Cloudy => 1.05,
            Weather::Windy => 1.10,
            Weather::Stormy => 1.20,
        }
    }

    /// Derating applied to expected travel speed.
    pub fn speed_factor(self) -> f64 {
        match self {
            Weather::Sunny => 1.0,
            Weather::Cloudy => 0.95,
            Weather::Windy | Weather::Stormy => 0.8,
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weather {
    type Err = FareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();
        Weather::ALL
            .into_iter()
            .find(|w| w.as_str() == label)
            .ok_or_else(|| FareError::UnknownWeather(s.to_string()))
    }
}

/// Traffic state at pickup time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Traffic {
    #[default]
    Flow,
    Congested,
}

impl Traffic {
    pub const ALL: [Traffic; 2] = [Traffic::Flow, Traffic::Congested];

    pub fn as_str(self) -> &'static str {
        match self {
            Traffic::Flow => "flow traffic",
            Traffic::Congested => "congested traffic",
        }
    }

    /// Expected speed before time-of-day and weather adjustments, in mph.
    pub fn base_speed_mph(self) -> f64 {
        match self {
            Traffic::Flow => 25.0,
            Traffic::Congested => 12.0,
        }
    }
}

impl fmt::Display for Traffic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Traffic {
    type Err = FareError;

    /// Accepts both the short (`flow`) and phrased (`flow traffic`) forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();
        let short = label.strip_suffix(" traffic").unwrap_or(&label).trim_end();
        match short {
            "flow" => Ok(Traffic::Flow),
            "congested" => Ok(Traffic::Congested),
            _ => Err(FareError::UnknownTraffic(s.to_string())),
        }
    }
}

impl Serialize for Traffic {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Traffic {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_multiplier_table() {
        assert_eq!(Weather::Sunny.fare_multiplier(), 1.00);
        assert_eq!(Weather::Cloudy.fare_multiplier(), 1.05);
        assert_eq!(Weather::Windy.fare_multiplier(), 1.10);
        assert_eq!(Weather::Stormy.fare_multiplier(), 1.20);
    }

    #[test]
    fn test_weather_speed_table() {
        assert_eq!(Weather::Sunny.speed_factor(), 1.0);
        assert_eq!(Weather::Cloudy.speed_factor(), 0.95);
        assert_eq!(Weather::Windy.speed_factor(), 0.8);
        assert_eq!(Weather::Stormy.speed_factor(), 0.8);
    }

    #[test]
    fn test_weather_parse_case_insensitive() {
        assert_eq!("SUNNY".parse::<Weather>().unwrap(), Weather::Sunny);
        assert_eq!(" Stormy ".parse::<Weather>().unwrap(), Weather::Stormy);
        assert_eq!("cloudy".parse::<Weather>().unwrap(), Weather::Cloudy);
    }

    #[test]
    fn test_weather_parse_rejects_unknown() {
        let err = "hail".parse::<Weather>().unwrap_err();
        assert!(matches!(err, FareError::UnknownWeather(ref label) if label == "hail"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_traffic_parse_both_phrasings() {
        assert_eq!("flow".parse::<Traffic>().unwrap(), Traffic::Flow);
        assert_eq!("Flow Traffic".parse::<Traffic>().unwrap(), Traffic::Flow);
        assert_eq!("congested".parse::<Traffic>().unwrap(), Traffic::Congested);
        assert_eq!(
            "CONGESTED TRAFFIC".parse::<Traffic>().unwrap(),
            Traffic::Congested
        );
    }

    #[test]
    fn test_traffic_parse_rejects_unknown() {
        assert!(matches!(
            "gridlock".parse::<Traffic>(),
            Err(FareError::UnknownTraffic(_))
        ));
        assert!("traffic".parse::<Traffic>().is_err());
    }

    #[test]
    fn test_traffic_base_speeds() {
        assert_eq!(Traffic::Flow.base_speed_mph(), 25.0);
        assert_eq!(Traffic::Congested.base_speed_mph(), 12.0);
    }

    #[test]
    fn test_labels_serialize_canonically() {
        assert_eq!(serde_json::to_string(&Weather::Windy).unwrap(), "\"windy\"");
        assert_eq!(
            serde_json::to_string(&Traffic::Congested).unwrap(),
            "\"congested traffic\""
        );
        let traffic: Traffic = serde_json::from_str("\"flow\"").unwrap();
        assert_eq!(traffic, Traffic::Flow);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Weather::default(), Weather::Sunny);
        assert_eq!(Traffic::default(), Traffic::Flow);
    }
}
