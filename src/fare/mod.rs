//! Fare calculation and confidence scoring engine.
//!
//! The engine is a pure computation: validation, haversine geometry, speed
//! modelling, surcharges, weather scaling and a plausibility score. The
//! service and route layers wrap it with statistics, caching and HTTP.

pub mod calculators;
pub mod conditions;
pub mod confidence;
pub mod engine;
pub mod error;
pub mod geo;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;
pub mod speed;
pub mod surcharges;
pub mod trip;
pub mod validation;

// Re-export commonly used items
pub use calculators::{round_money, FareBreakdown, FareStructure};
pub use conditions::{Traffic, Weather};
pub use engine::{FareQuote, PredictionEngine, PredictionResult, PredictionStatus};
pub use error::{Endpoint, FareError};
pub use geo::{Coordinate, TripGeometry};
pub use requests::{BatchPredictionRequest, PredictionRequest};
pub use routes::router;
pub use services::{FareService, PredictionStats};
pub use trip::TripRequest;
