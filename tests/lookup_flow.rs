//! End-to-end tests for the cache-aside lookup flow
//!
//! The upstream boundary is a wiremock server with request-count
//! expectations (verified when the server drops); the cache boundary is the
//! in-process store, plus spy and failing wrappers defined here.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use cityweather::cache::{CacheError, CacheStore, MemoryStore};
use cityweather::data::{UpstreamClient, UpstreamError};
use cityweather::lookup::{LookupError, WeatherService};
use cityweather::WeatherRecord;

/// TTL used by every test service
const TTL: Duration = Duration::from_secs(600);

/// Cache store wrapper that counts calls and records the last write TTL
#[derive(Default)]
struct SpyStore {
    inner: MemoryStore,
    gets: AtomicUsize,
    sets: AtomicUsize,
    last_ttl: Mutex<Option<Duration>>,
}

#[async_trait]
impl CacheStore for SpyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        *self.last_ttl.lock().expect("ttl mutex poisoned") = Some(ttl);
        self.inner.set(key, value, ttl).await
    }
}

/// Cache store whose backend is permanently down
struct FailingStore;

#[async_trait]
impl CacheStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

fn service_against<S: CacheStore>(store: S, server: &MockServer) -> WeatherService<S> {
    let upstream = UpstreamClient::new("test-key")
        .expect("Failed to build upstream client")
        .with_base_url(server.uri());
    WeatherService::new(store, upstream, TTL)
}

/// Mounts a 200 response with the given forecast day, expecting
/// `expected_calls` requests over the server's lifetime
async fn mount_forecast(server: &MockServer, day: serde_json::Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "days": [day] })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn cache_hit_is_served_without_an_upstream_call() {
    let server = MockServer::start().await;
    mount_forecast(&server, json!({"temp": 20.0}), 0).await;

    let cached = WeatherRecord {
        city: "Seoul".to_string(),
        temperature: 18.5,
        condition: "Clear".to_string(),
    };
    let store = Arc::new(SpyStore::default());
    store
        .inner
        .set(
            "Seoul",
            &serde_json::to_string(&cached).expect("Failed to serialize"),
            TTL,
        )
        .await
        .expect("Seed write should succeed");

    let service = service_against(store.clone(), &server);
    let record = service.lookup("Seoul").await.expect("Lookup should succeed");

    assert_eq!(record, cached);
    assert_eq!(store.sets.load(Ordering::SeqCst), 0, "A hit must not rewrite the cache");
}

#[tokio::test]
async fn cold_cache_fetches_once_and_writes_once_with_the_fixed_ttl() {
    let server = MockServer::start().await;
    mount_forecast(&server, json!({"temp": 27.3, "conditions": "Partially cloudy"}), 1).await;

    let store = Arc::new(SpyStore::default());
    let service = service_against(store.clone(), &server);

    let record = service.lookup("Seoul").await.expect("Lookup should succeed");

    assert_eq!(record.city, "Seoul");
    assert!((record.temperature - 27.3).abs() < 0.01);
    assert_eq!(record.condition, "Partially cloudy");

    assert_eq!(store.gets.load(Ordering::SeqCst), 1);
    assert_eq!(store.sets.load(Ordering::SeqCst), 1);
    assert_eq!(
        *store.last_ttl.lock().expect("ttl mutex poisoned"),
        Some(TTL),
        "Writes must use the configured TTL"
    );

    // Round-trip: what landed in the cache deserializes back to the record
    // the caller got.
    let raw = store
        .inner
        .get("Seoul")
        .await
        .expect("Cache read should succeed")
        .expect("Record should have been cached");
    let reread: WeatherRecord = serde_json::from_str(&raw).expect("Cached entry should parse");
    assert_eq!(reread, record);
}

#[tokio::test]
async fn second_lookup_is_served_from_cache() {
    let server = MockServer::start().await;
    mount_forecast(&server, json!({"temp": 10.0, "conditions": "Rain"}), 1).await;

    let store = Arc::new(SpyStore::default());
    let service = service_against(store.clone(), &server);

    let first = service.lookup("Seoul").await.expect("First lookup should succeed");
    let second = service.lookup("Seoul").await.expect("Second lookup should succeed");

    assert_eq!(first, second);
    assert_eq!(store.sets.load(Ordering::SeqCst), 1, "Only the miss should write");
}

#[tokio::test]
async fn empty_day_object_normalizes_to_defaults() {
    let server = MockServer::start().await;
    mount_forecast(&server, json!({}), 1).await;

    let service = service_against(MemoryStore::new(), &server);
    let record = service.lookup("Seoul").await.expect("Lookup should succeed");

    assert_eq!(record.temperature, 0.0);
    assert_eq!(record.condition, "Unknown");
}

#[tokio::test]
async fn structurally_invalid_payloads_fail_and_never_poison_the_cache() {
    for body in [json!({"days": []}), json!({"resolvedAddress": "Seoul"})] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let service = service_against(store.clone(), &server);

        let err = service.lookup("Seoul").await.expect_err("Lookup should fail");

        assert!(matches!(err, LookupError::Normalize(_)));
        assert!(store.is_empty(), "A malformed response must not be cached");
    }
}

#[tokio::test]
async fn empty_city_fails_before_cache_and_network() {
    let server = MockServer::start().await;
    mount_forecast(&server, json!({"temp": 20.0}), 0).await;

    let store = Arc::new(SpyStore::default());
    let service = service_against(store.clone(), &server);

    for city in ["", "   ", "\t"] {
        let err = service.lookup(city).await.expect_err("Lookup should fail");
        assert!(matches!(err, LookupError::EmptyCity));
    }

    assert_eq!(store.gets.load(Ordering::SeqCst), 0);
    assert_eq!(store.sets.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn upstream_failure_status_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("provider exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let service = service_against(store.clone(), &server);

    let err = service.lookup("Seoul").await.expect_err("Lookup should fail");

    match err {
        LookupError::Upstream(UpstreamError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "provider exploded");
        }
        other => panic!("Expected upstream status error, got {:?}", other),
    }
    assert!(store.is_empty(), "A failed fetch must not write the cache");
}

#[tokio::test]
async fn corrupt_cache_entry_is_refetched_and_overwritten() {
    let server = MockServer::start().await;
    mount_forecast(&server, json!({"temp": 16.0, "conditions": "Fog"}), 1).await;

    let store = Arc::new(MemoryStore::new());
    store
        .set("Seoul", "{not valid json", TTL)
        .await
        .expect("Seed write should succeed");

    let service = service_against(store.clone(), &server);
    let record = service.lookup("Seoul").await.expect("Lookup should succeed");

    assert_eq!(record.condition, "Fog");

    let raw = store
        .get("Seoul")
        .await
        .expect("Cache read should succeed")
        .expect("Entry should have been replaced");
    let reread: WeatherRecord = serde_json::from_str(&raw).expect("Replacement should parse");
    assert_eq!(reread, record);
}

#[tokio::test]
async fn cache_backend_failures_degrade_to_a_working_lookup() {
    let server = MockServer::start().await;
    mount_forecast(&server, json!({"temp": 8.0, "conditions": "Drizzle"}), 1).await;

    // Both the read (degrades to miss) and the write (best-effort) fail;
    // the lookup must still return the fetched record.
    let service = service_against(FailingStore, &server);
    let record = service.lookup("Seoul").await.expect("Lookup should succeed");

    assert!((record.temperature - 8.0).abs() < 0.01);
    assert_eq!(record.condition, "Drizzle");
}
