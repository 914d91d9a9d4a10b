//! Behaviour tests for the cache store contract.
//!
//! These tests verify HOW the cache behaves around expiry, deletion and
//! backing-store outages. All timing runs on tokio's paused clock.

use std::time::Duration;

use stockfolio_core::{
    CacheStore, CacheStoreExt, ConnectionState, MemoryCacheStore, NoopCacheStore,
    RedisCacheConfig, RedisCacheStore, SearchResult, Ttl,
};

fn sample_results() -> Vec<SearchResult> {
    vec![SearchResult {
        symbol: String::from("AAPL"),
        name: String::from("Apple Inc."),
        security_type: String::from("Equity"),
        region: String::from("United States"),
        market_open: String::from("09:30"),
        market_close: String::from("16:00"),
        timezone: String::from("UTC-04"),
        currency: String::from("USD"),
        match_score: 1.0,
    }]
}

// =============================================================================
// Cache: Expiry
// =============================================================================

#[tokio::test(start_paused = true)]
async fn when_value_is_set_it_is_readable_until_its_ttl_elapses() {
    // Given: An empty cache
    let cache = MemoryCacheStore::new();

    // When: A value is stored for 60 seconds
    cache
        .set("stock_search:aapl", &sample_results(), Ttl::from_secs(60))
        .await;

    // Then: It reads back immediately and just before expiry
    assert_eq!(
        cache.get::<Vec<SearchResult>>("stock_search:aapl").await,
        Some(sample_results())
    );
    tokio::time::advance(Duration::from_secs(59)).await;
    assert!(cache.exists("stock_search:aapl").await);

    // And: It is absent once the TTL has elapsed
    tokio::time::advance(Duration::from_secs(1)).await;
    assert_eq!(cache.get::<Vec<SearchResult>>("stock_search:aapl").await, None);
}

#[tokio::test(start_paused = true)]
async fn when_key_was_never_set_or_was_deleted_reads_are_absent() {
    // Given: A cache holding one long-lived key
    let cache = MemoryCacheStore::new();
    assert_eq!(cache.get::<String>("stock_current:AAPL").await, None);
    cache
        .set("stock_current:AAPL", "185.85", Ttl::from_secs(86_400))
        .await;

    // When: The key is deleted
    cache.delete("stock_current:AAPL").await;

    // Then: It is absent regardless of the remaining TTL
    assert_eq!(cache.get::<String>("stock_current:AAPL").await, None);
    assert!(!cache.exists("stock_current:AAPL").await);
}

#[tokio::test(start_paused = true)]
async fn when_expire_is_called_the_remaining_lifetime_is_reset() {
    // Given: A key with 10 seconds left
    let cache = MemoryCacheStore::new();
    cache.set("k", &42_u32, Ttl::from_secs(10)).await;

    // When: Its TTL is reset to 120 seconds after 8 seconds
    tokio::time::advance(Duration::from_secs(8)).await;
    cache.expire("k", Ttl::from_secs(120)).await;

    // Then: It survives past the original deadline
    tokio::time::advance(Duration::from_secs(60)).await;
    assert_eq!(cache.get::<u32>("k").await, Some(42));
}

#[tokio::test]
async fn when_cache_is_cleared_every_entry_is_gone() {
    let cache = MemoryCacheStore::new();
    cache.set("a", &1_u8, Ttl::from_secs(60)).await;
    cache.set("b", &2_u8, Ttl::from_secs(60)).await;

    let cleared = cache.clear().await;

    assert!(cleared);
    assert!(cache.is_empty().await);
    assert_eq!(cache.get::<u8>("a").await, None);
}

// =============================================================================
// Cache: Degradation
// =============================================================================

#[tokio::test]
async fn when_backing_store_is_unhealthy_operations_never_fail_and_reads_are_absent() {
    // Given: A cache whose backing store is down
    let cache = MemoryCacheStore::new();
    cache.set_healthy(false);

    // When: The usual operations run
    cache.set("k", "v", Ttl::from_secs(60)).await;
    cache.expire("k", Ttl::from_secs(60)).await;
    cache.delete("k").await;
    let cleared = cache.clear().await;

    // Then: Reads are absent, the flush is not reported as done and the state is reported
    assert_eq!(cache.get::<String>("k").await, None);
    assert!(!cache.exists("k").await);
    assert!(!cleared);
    assert_eq!(cache.connection_state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn when_no_cache_is_configured_everything_misses() {
    let cache = NoopCacheStore;
    cache.set("k", "v", Ttl::from_secs(60)).await;

    assert_eq!(cache.get::<String>("k").await, None);
    assert!(!cache.is_healthy());
}

#[tokio::test]
async fn when_redis_is_unreachable_the_store_behaves_as_empty() {
    // Given: A redis URL nothing listens on
    let mut config = RedisCacheConfig::new("redis://127.0.0.1:1/0");
    config.connect_timeout = Duration::from_millis(500);

    // When: The store is created and used
    let cache = RedisCacheStore::connect(config)
        .await
        .expect("well-formed url should be accepted");
    cache
        .set("stock_search:aapl", &sample_results(), Ttl::from_secs(3_600))
        .await;

    // Then: It reports disconnected and reads miss
    assert_eq!(cache.connection_state(), ConnectionState::Disconnected);
    assert_eq!(cache.get::<Vec<SearchResult>>("stock_search:aapl").await, None);
}
