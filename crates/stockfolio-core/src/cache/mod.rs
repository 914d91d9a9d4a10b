//! Best-effort TTL cache.
//!
//! Every operation degrades to a miss or a no-op when the backing store is
//! unreachable, so callers never fail because of the cache. Failures are
//! logged and otherwise only observable as absence.
//!
//! | Type | Backing |
//! |------|---------|
//! | [`RedisCacheStore`] | External redis server (production) |
//! | [`MemoryCacheStore`] | In-process map (tests, offline runs) |
//! | [`NoopCacheStore`] | Nothing; used when no cache URL is configured |

mod memory;
mod redis_store;

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

pub use self::memory::MemoryCacheStore;
pub use self::redis_store::{RedisCacheConfig, RedisCacheStore};

/// Boxed future returned by [`CacheStore`] operations.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Time-to-live in whole seconds; always at least one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ttl(u64);

impl Ttl {
    /// Zero is raised to one second.
    pub const fn from_secs(secs: u64) -> Self {
        if secs == 0 {
            Self(1)
        } else {
            Self(secs)
        }
    }

    pub const fn as_secs(self) -> u64 {
        self.0
    }

    pub const fn as_duration(self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl Display for Ttl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Connection state of a cache backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }

    pub(crate) const fn to_u8(self) -> u8 {
        match self {
            Self::Disconnected => 0,
            Self::Connecting => 1,
            Self::Connected => 2,
        }
    }

    pub(crate) const fn from_u8(value: u8) -> Self {
        match value {
            2 => Self::Connected,
            1 => Self::Connecting,
            _ => Self::Disconnected,
        }
    }
}

impl Display for ConnectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value store of serialized values with per-key TTL.
///
/// None of the operations can fail from the caller's point of view:
/// `get_raw` returns `None` for absent, expired or unreachable entries and the
/// mutating operations silently do nothing when the backing store is down.
pub trait CacheStore: Send + Sync {
    fn get_raw<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<String>>;

    fn set_raw<'a>(&'a self, key: &'a str, value: String, ttl: Ttl) -> CacheFuture<'a, ()>;

    fn delete<'a>(&'a self, key: &'a str) -> CacheFuture<'a, ()>;

    fn exists<'a>(&'a self, key: &'a str) -> CacheFuture<'a, bool>;

    /// Drop every entry of the store. `true` only when the backing store
    /// confirmed the flush.
    fn clear(&self) -> CacheFuture<'_, bool>;

    /// Reset the remaining lifetime of an existing key.
    fn expire<'a>(&'a self, key: &'a str, ttl: Ttl) -> CacheFuture<'a, ()>;

    fn connection_state(&self) -> ConnectionState;

    /// Diagnostics only; operations already degrade on their own.
    fn is_healthy(&self) -> bool {
        self.connection_state() == ConnectionState::Connected
    }
}

/// Typed access on top of [`CacheStore`], serializing values as JSON.
pub trait CacheStoreExt: CacheStore {
    fn get<'a, T>(&'a self, key: &'a str) -> CacheFuture<'a, Option<T>>
    where
        T: DeserializeOwned + Send + 'a,
        Self: 'a,
    {
        Box::pin(async move {
            let raw = self.get_raw(key).await?;
            match serde_json::from_str(&raw) {
                Ok(value) => {
                    debug!(key, "cache hit");
                    Some(value)
                }
                Err(error) => {
                    warn!(key, %error, "discarding undecodable cache entry");
                    None
                }
            }
        })
    }

    fn set<'a, T>(&'a self, key: &'a str, value: &T, ttl: Ttl) -> CacheFuture<'a, ()>
    where
        T: Serialize + ?Sized,
        Self: 'a,
    {
        let encoded = serde_json::to_string(value);
        Box::pin(async move {
            match encoded {
                Ok(raw) => self.set_raw(key, raw, ttl).await,
                Err(error) => warn!(key, %error, "skipping cache write for unserializable value"),
            }
        })
    }
}

impl<S: CacheStore + ?Sized> CacheStoreExt for S {}

/// Cache that stores nothing. Every read misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCacheStore;

impl CacheStore for NoopCacheStore {
    fn get_raw<'a>(&'a self, _key: &'a str) -> CacheFuture<'a, Option<String>> {
        Box::pin(async { None })
    }

    fn set_raw<'a>(&'a self, _key: &'a str, _value: String, _ttl: Ttl) -> CacheFuture<'a, ()> {
        Box::pin(async {})
    }

    fn delete<'a>(&'a self, _key: &'a str) -> CacheFuture<'a, ()> {
        Box::pin(async {})
    }

    fn exists<'a>(&'a self, _key: &'a str) -> CacheFuture<'a, bool> {
        Box::pin(async { false })
    }

    fn clear(&self) -> CacheFuture<'_, bool> {
        Box::pin(async { false })
    }

    fn expire<'a>(&'a self, _key: &'a str, _ttl: Ttl) -> CacheFuture<'a, ()> {
        Box::pin(async {})
    }

    fn connection_state(&self) -> ConnectionState {
        ConnectionState::Disconnected
    }
}
