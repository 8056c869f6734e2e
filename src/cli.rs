//! Command-line interface for City Weather CLI
//!
//! This module handles parsing of CLI arguments using clap and rendering
//! of lookup results for console output.

use clap::Parser;

use crate::data::WeatherRecord;

/// City Weather CLI - look up current weather for a city
#[derive(Parser, Debug)]
#[command(name = "cityweather")]
#[command(about = "Look up current weather for a city, cached in Redis")]
#[command(version)]
pub struct Cli {
    /// City to look up, e.g. "Seoul" or "New York"
    ///
    /// The city is also the cache key, exactly as typed: "Seoul" and
    /// "seoul" are cached separately.
    pub city: String,

    /// Print the record as JSON instead of a one-line summary
    #[arg(long)]
    pub json: bool,

    /// Skip Redis for this run; the lookup goes straight to the provider
    #[arg(long)]
    pub no_cache: bool,
}

/// Renders a record as the default one-line console output
pub fn format_record(record: &WeatherRecord) -> String {
    format!(
        "{}: {:.1}°C, {}",
        record.city, record.temperature, record.condition
    )
}
