//! City Weather CLI - look up current weather for a city
//!
//! Resolves configuration from the environment, wires up the process-wide
//! clients (HTTP, Redis), runs a single lookup, and prints the result.

use std::error::Error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cityweather::cache::{CacheStore, MemoryStore, RedisStore};
use cityweather::cli::{self, Cli};
use cityweather::config::Config;
use cityweather::data::{UpstreamClient, WeatherRecord};
use cityweather::lookup::{LookupError, WeatherService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let upstream = UpstreamClient::new(&config.api_key)?;

    let record = if cli.no_cache {
        run_lookup(MemoryStore::new(), upstream, &config, &cli.city).await?
    } else {
        let store = RedisStore::connect(&config.redis_url).await?;
        run_lookup(store, upstream, &config, &cli.city).await?
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("{}", cli::format_record(&record));
    }

    Ok(())
}

/// Builds the service around whichever store was selected and runs one lookup
async fn run_lookup<S: CacheStore>(
    store: S,
    upstream: UpstreamClient,
    config: &Config,
    city: &str,
) -> Result<WeatherRecord, LookupError> {
    let service = WeatherService::new(store, upstream, config.cache_ttl);
    service.lookup(city).await
}
