//! Service configuration
//!
//! Settings come from environment variables (after `.env` is loaded by
//! `main`). Each deployment environment has its own defaults; explicit
//! variables override them.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use ::config::{Config, Map};
use serde::{de, Deserialize, Deserializer};
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Load(#[from] ::config::ConfigError),
}

impl ConfigError {
    fn invalid(key: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Environment {
    Development,
    Staging,
    Production,
    Testing,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
            Environment::Testing => "testing",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            "testing" => Ok(Environment::Testing),
            _ => Err(ConfigError::invalid(
                "ENVIRONMENT",
                s,
                "must be one of: development, staging, production, testing",
            )),
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

const LOG_LEVELS: [&str; 7] = ["trace", "debug", "info", "warn", "warning", "error", "critical"];

const DEFAULT_CORS_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:8080",
    "http://127.0.0.1:8080",
];

/// Application settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub environment: Environment,
    /// A `tracing` level directive (trace, debug, info, warn, error)
    #[serde(deserialize_with = "log_level")]
    pub log_level: String,
    pub host: String,
    pub port: u16,
    #[serde(rename = "api_v1_str")]
    pub api_prefix: String,
    /// `*` allows any origin
    #[serde(deserialize_with = "origin_list")]
    pub cors_origins: Vec<String>,
    /// Request deadline applied by the HTTP layer
    #[serde(deserialize_with = "positive_seconds")]
    pub max_prediction_time: Duration,
    pub cache_predictions: bool,
    #[serde(deserialize_with = "whole_seconds")]
    pub cache_ttl: Duration,
    pub max_batch_size: usize,
}

impl Settings {
    /// Defaults for a deployment environment.
    pub fn for_environment(environment: Environment) -> Self {
        let (log_level, cache_predictions) = match environment {
            Environment::Development | Environment::Testing => ("debug", false),
            Environment::Staging => ("info", false),
            Environment::Production => ("info", true),
        };

        Self {
            environment,
            log_level: log_level.to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            api_prefix: "/api/v1".to_string(),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            max_prediction_time: Duration::from_secs(5),
            cache_predictions,
            cache_ttl: Duration::from_secs(300),
            max_batch_size: 100,
        }
    }

    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(::config::Environment::default())
    }

    /// Load settings from an explicit variable map instead of the process
    /// environment.
    pub fn from_vars(vars: Map<String, String>) -> Result<Self, ConfigError> {
        Self::load(::config::Environment::default().source(Some(vars)))
    }

    fn load(source: ::config::Environment) -> Result<Self, ConfigError> {
        let source = source
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("cors_origins");

        // The profile picks the defaults, so it has to be known first
        let environment = match Config::builder()
            .add_source(source.clone())
            .build()?
            .get_string("environment")
        {
            Ok(value) => value.parse()?,
            Err(::config::ConfigError::NotFound(_)) => Environment::Development,
            Err(err) => return Err(err.into()),
        };
        let defaults = Self::for_environment(environment);

        let settings: Settings = Config::builder()
            .set_default("environment", environment.as_str())?
            .set_default("log_level", defaults.log_level.as_str())?
            .set_default("host", defaults.host.as_str())?
            .set_default("port", i64::from(defaults.port))?
            .set_default("api_v1_str", defaults.api_prefix.as_str())?
            .set_default("cors_origins", defaults.cors_origins.clone())?
            .set_default(
                "max_prediction_time",
                defaults.max_prediction_time.as_secs_f64(),
            )?
            .set_default("cache_predictions", defaults.cache_predictions)?
            .set_default("cache_ttl", defaults.cache_ttl.as_secs() as i64)?
            .set_default("max_batch_size", defaults.max_batch_size as i64)?
            .add_source(source)
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate numeric ranges and string values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.api_prefix.starts_with('/') || self.api_prefix.trim_end_matches('/').is_empty() {
            return Err(ConfigError::invalid(
                "API_V1_STR",
                &self.api_prefix,
                "must start with '/' and name a path below the root",
            ));
        }
        if self.max_prediction_time > Duration::from_secs(300) {
            return Err(ConfigError::invalid(
                "MAX_PREDICTION_TIME",
                self.max_prediction_time.as_secs_f64().to_string(),
                "cannot exceed 300 seconds",
            ));
        }
        if self.cache_ttl.is_zero() || self.cache_ttl > Duration::from_secs(24 * 60 * 60) {
            return Err(ConfigError::invalid(
                "CACHE_TTL",
                self.cache_ttl.as_secs().to_string(),
                "must be between 1 and 86400 seconds",
            ));
        }
        if !(1..=1000).contains(&self.max_batch_size) {
            return Err(ConfigError::invalid(
                "MAX_BATCH_SIZE",
                self.max_batch_size.to_string(),
                "must be between 1 and 1000",
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::for_environment(Environment::Development)
    }
}

/// Map accepted level names onto `tracing` directives.
fn normalize_log_level(raw: &str) -> Result<String, ConfigError> {
    let level = raw.trim().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(ConfigError::invalid(
            "LOG_LEVEL",
            raw,
            format!("must be one of: {}", LOG_LEVELS.join(", ")),
        ));
    }
    Ok(match level.as_str() {
        "warning" => "warn".to_string(),
        "critical" => "error".to_string(),
        _ => level,
    })
}

fn log_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = String::deserialize(deserializer)?;
    normalize_log_level(&raw).map_err(de::Error::custom)
}

fn origin_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let origins = Vec::<String>::deserialize(deserializer)?;
    Ok(origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect())
}

fn positive_seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let seconds = f64::deserialize(deserializer)?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(de::Error::custom(ConfigError::invalid(
            "MAX_PREDICTION_TIME",
            seconds.to_string(),
            "must be a positive number of seconds",
        )));
    }
    Duration::try_from_secs_f64(seconds).map_err(|_| {
        de::Error::custom(ConfigError::invalid(
            "MAX_PREDICTION_TIME",
            seconds.to_string(),
            "out of range",
        ))
    })
}

fn whole_seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_secs)
}
