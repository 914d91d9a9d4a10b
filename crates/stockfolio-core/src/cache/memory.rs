//! In-process cache store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::{CacheFuture, CacheStore, ConnectionState, Ttl};

#[derive(Debug, Clone)]
struct CacheEntry {
    body: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Thread-safe in-memory TTL store.
///
/// Expiry is measured on the tokio clock, so tests running with a paused
/// clock can advance past a TTL without sleeping. `set_healthy(false)`
/// simulates an outage of the backing store.
#[derive(Debug, Clone)]
pub struct MemoryCacheStore {
    map: Arc<RwLock<HashMap<String, CacheEntry>>>,
    healthy: Arc<AtomicBool>,
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self {
            map: Arc::new(RwLock::new(HashMap::new())),
            healthy: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.map.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Remaining lifetime of a live key.
    pub async fn ttl(&self, key: &str) -> Option<std::time::Duration> {
        let now = Instant::now();
        let map = self.map.read().await;
        map.get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.expires_at - now)
    }

    /// Remove expired entries.
    pub async fn purge_expired(&self) {
        let now = Instant::now();
        self.map.write().await.retain(|_, entry| entry.is_live(now));
    }

    fn available(&self, operation: &'static str, key: &str) -> bool {
        let healthy = self.healthy.load(Ordering::SeqCst);
        if !healthy {
            warn!(operation, key, "memory cache marked unavailable, skipping");
        }
        healthy
    }
}

impl CacheStore for MemoryCacheStore {
    fn get_raw<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<String>> {
        Box::pin(async move {
            if !self.available("get", key) {
                return None;
            }
            let now = Instant::now();
            let map = self.map.read().await;
            let body = map
                .get(key)
                .filter(|entry| entry.is_live(now))
                .map(|entry| entry.body.clone());
            if body.is_none() {
                debug!(key, "cache miss");
            }
            body
        })
    }

    fn set_raw<'a>(&'a self, key: &'a str, value: String, ttl: Ttl) -> CacheFuture<'a, ()> {
        Box::pin(async move {
            if !self.available("set", key) {
                return;
            }
            let expires_at = Instant::now() + ttl.as_duration();
            self.map.write().await.insert(
                key.to_owned(),
                CacheEntry {
                    body: value,
                    expires_at,
                },
            );
            debug!(key, ttl_secs = ttl.as_secs(), "cache entry stored");
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> CacheFuture<'a, ()> {
        Box::pin(async move {
            if self.available("delete", key) {
                self.map.write().await.remove(key);
            }
        })
    }

    fn exists<'a>(&'a self, key: &'a str) -> CacheFuture<'a, bool> {
        Box::pin(async move {
            if !self.available("exists", key) {
                return false;
            }
            let now = Instant::now();
            self.map
                .read()
                .await
                .get(key)
                .is_some_and(|entry| entry.is_live(now))
        })
    }

    fn clear(&self) -> CacheFuture<'_, bool> {
        Box::pin(async move {
            if !self.available("clear", "*") {
                return false;
            }
            self.map.write().await.clear();
            true
        })
    }

    fn expire<'a>(&'a self, key: &'a str, ttl: Ttl) -> CacheFuture<'a, ()> {
        Box::pin(async move {
            if !self.available("expire", key) {
                return;
            }
            let now = Instant::now();
            let mut map = self.map.write().await;
            if let Some(entry) = map.get_mut(key).filter(|entry| entry.is_live(now)) {
                entry.expires_at = now + ttl.as_duration();
            }
        })
    }

    fn connection_state(&self) -> ConnectionState {
        if self.healthy.load(Ordering::SeqCst) {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }
}
