//! Core data models for City Weather CLI
//!
//! This module contains the canonical weather record returned by lookups,
//! plus the upstream client and response normalizer submodules.

pub mod normalize;
pub mod upstream;

pub use normalize::{normalize, NormalizeError};
pub use upstream::{UpstreamClient, UpstreamError};

use serde::{Deserialize, Serialize};

/// Current weather for a single city
///
/// This is the unit of data the whole crate trades in: it is what lookups
/// return and what gets serialized into the cache. The wire field names
/// (`city`, `temp`, `weather`) are the cache storage format, so changing
/// them invalidates every previously cached entry.
///
/// A record is never mutated after construction; a refreshed value for the
/// same city fully replaces the old cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// City the record describes, as given by the caller
    pub city: String,
    /// Temperature in Celsius
    #[serde(rename = "temp")]
    pub temperature: f64,
    /// Short human-readable sky/weather state, e.g. "Partially cloudy"
    #[serde(rename = "weather")]
    pub condition: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_with_wire_names() {
        let record = WeatherRecord {
            city: "Seoul".to_string(),
            temperature: 21.5,
            condition: "Clear".to_string(),
        };

        let json = serde_json::to_string(&record).expect("Failed to serialize record");
        assert!(json.contains("\"city\":\"Seoul\""));
        assert!(json.contains("\"temp\":21.5"));
        assert!(json.contains("\"weather\":\"Clear\""));
    }

    #[test]
    fn test_record_roundtrips_through_json() {
        let original = WeatherRecord {
            city: "Vancouver".to_string(),
            temperature: -3.25,
            condition: "Snow".to_string(),
        };

        let json = serde_json::to_string(&original).expect("Failed to serialize record");
        let parsed: WeatherRecord = serde_json::from_str(&json).expect("Failed to parse record");

        assert_eq!(parsed, original);
    }
}
