//! Defensive normalization of upstream forecast payloads
//!
//! The provider's timeline response is treated as untrusted: the `days` list
//! is load-bearing and its absence fails the normalization, while the fields
//! inside the first day are best-effort and degrade to defaults.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use super::WeatherRecord;

/// Temperature used when the day entry has no usable `temp` field
const DEFAULT_TEMPERATURE: f64 = 0.0;

/// Condition used when the day entry has no usable `conditions` field
const DEFAULT_CONDITION: &str = "Unknown";

/// Errors that can occur when normalizing an upstream payload
///
/// Only structural problems appear here; missing or mistyped day fields
/// fall back to defaults instead of failing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// The payload has no `days` list, or `days` is not a list
    #[error("response is missing a 'days' list")]
    MissingDays,

    /// The `days` list is present but empty
    #[error("response 'days' list is empty")]
    EmptyDays,

    /// The first `days` entry is not an object
    #[error("first 'days' entry is not an object")]
    MalformedDay,
}

/// The subset of a timeline day entry we care about, decoded tolerantly
///
/// Every field is optional and the deserializers below never reject a
/// mistyped value; they yield `None` instead, so a single bad field cannot
/// sink the whole day.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DayFields {
    #[serde(deserialize_with = "lenient_f64")]
    temp: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    conditions: Option<String>,
}

/// Accepts any JSON value, yielding `Some` only for numbers
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

/// Accepts any JSON value, yielding `Some` only for strings
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}

/// Extracts a WeatherRecord from a raw timeline payload
///
/// # Arguments
/// * `city` - The city the payload was requested for; becomes the record's
///   `city` field verbatim
/// * `payload` - The raw JSON tree from the upstream client
///
/// # Returns
/// * `Ok(WeatherRecord)` if the payload has at least one day entry
/// * `Err(NormalizeError)` if the `days` list is absent, empty, or its first
///   entry is not an object
pub fn normalize(city: &str, payload: &Value) -> Result<WeatherRecord, NormalizeError> {
    let days = payload
        .get("days")
        .and_then(Value::as_array)
        .ok_or(NormalizeError::MissingDays)?;

    let first = days.first().ok_or(NormalizeError::EmptyDays)?;
    if !first.is_object() {
        return Err(NormalizeError::MalformedDay);
    }

    let fields: DayFields =
        serde_json::from_value(first.clone()).map_err(|_| NormalizeError::MalformedDay)?;

    Ok(WeatherRecord {
        city: city.to_string(),
        temperature: fields.temp.unwrap_or(DEFAULT_TEMPERATURE),
        condition: fields
            .conditions
            .unwrap_or_else(|| DEFAULT_CONDITION.to_string()),
    })
}
