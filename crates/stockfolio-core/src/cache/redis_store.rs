//! Redis-backed cache store.

use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError, RedisResult};
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tracing::{debug, error, info, warn};

use super::{CacheFuture, CacheStore, ConnectionState, Ttl};

/// Connection settings for [`RedisCacheStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisCacheConfig {
    /// `redis://[user:password@]host:port[/db]`
    pub url: String,
    pub connect_timeout: Duration,
    /// Upper bound for a single command, reconnect included.
    pub command_timeout: Duration,
    /// Minimum quiet period after a failure before the next operation is
    /// let through to probe the server again.
    pub reconnect_cooldown: Duration,
}

impl RedisCacheConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connect_timeout: Duration::from_secs(10),
            command_timeout: Duration::from_secs(30),
            reconnect_cooldown: Duration::from_secs(5),
        }
    }
}

/// Cache store on a redis server.
///
/// Reconnection after a dropped socket is left to redis' `ConnectionManager`.
/// The store itself only tracks the connection state: after a failure it
/// short-circuits every operation to a miss until `reconnect_cooldown` has
/// passed, then lets the next operation through as a probe.
pub struct RedisCacheStore {
    client: Client,
    manager: RwLock<Option<ConnectionManager>>,
    /// Held by the one task currently opening a connection.
    connect_gate: AsyncMutex<()>,
    state: AtomicU8,
    last_failure: Mutex<Option<Instant>>,
    config: RedisCacheConfig,
}

impl RedisCacheStore {
    /// Create the store and try to connect once.
    ///
    /// Only a malformed URL is an error; an unreachable server yields a store
    /// in the `Disconnected` state that behaves as an empty cache.
    pub async fn connect(config: RedisCacheConfig) -> RedisResult<Self> {
        let client = Client::open(config.url.as_str())?;
        let store = Self {
            client,
            manager: RwLock::new(None),
            connect_gate: AsyncMutex::new(()),
            state: AtomicU8::new(ConnectionState::Disconnected.to_u8()),
            last_failure: Mutex::new(None),
            config,
        };

        if store.establish().await.is_some() {
            info!("redis cache connected");
        }
        Ok(store)
    }

    pub fn config(&self) -> &RedisCacheConfig {
        &self.config
    }

    fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn transition(&self, next: ConnectionState) {
        let previous = ConnectionState::from_u8(self.state.swap(next.to_u8(), Ordering::SeqCst));
        if previous != next {
            debug!(from = %previous, to = %next, "redis cache state changed");
        }
    }

    fn mark_connected(&self) {
        self.transition(ConnectionState::Connected);
    }

    fn mark_failed(&self) {
        if let Ok(mut last_failure) = self.last_failure.lock() {
            *last_failure = Some(Instant::now());
        }
        self.transition(ConnectionState::Disconnected);
    }

    fn cooldown_elapsed(&self) -> bool {
        self.last_failure
            .lock()
            .map(|last_failure| {
                last_failure
                    .map(|at| at.elapsed() >= self.config.reconnect_cooldown)
                    .unwrap_or(true)
            })
            .unwrap_or(true)
    }

    /// Open the connection manager.
    ///
    /// The connect attempt runs without holding `manager`. While one task is
    /// connecting, concurrent callers get `None` and degrade to a miss.
    async fn establish(&self) -> Option<ConnectionManager> {
        let Ok(_gate) = self.connect_gate.try_lock() else {
            debug!("redis connection attempt already in flight");
            return None;
        };
        if let Some(manager) = self.manager.read().await.clone() {
            return Some(manager);
        }

        self.transition(ConnectionState::Connecting);
        let connecting = ConnectionManager::new(self.client.clone());
        match tokio::time::timeout(self.config.connect_timeout, connecting).await {
            Ok(Ok(manager)) => {
                *self.manager.write().await = Some(manager.clone());
                self.mark_connected();
                Some(manager)
            }
            Ok(Err(err)) => {
                error!(error = %err, "redis connection failed");
                self.mark_failed();
                None
            }
            Err(_) => {
                error!(
                    timeout_ms = self.config.connect_timeout.as_millis() as u64,
                    "redis connection timed out"
                );
                self.mark_failed();
                None
            }
        }
    }

    /// Connection to run a command on, or `None` while the store is cooling
    /// down after a failure.
    async fn connection(&self) -> Option<ConnectionManager> {
        match self.state() {
            ConnectionState::Connected => {}
            _ if !self.cooldown_elapsed() => return None,
            _ => self.transition(ConnectionState::Connecting),
        }

        let existing = self.manager.read().await.clone();
        match existing {
            Some(manager) => Some(manager),
            None => self.establish().await,
        }
    }

    async fn run<T, F, Fut>(&self, operation: &'static str, key: &str, command: F) -> Option<T>
    where
        F: FnOnce(ConnectionManager) -> Fut,
        Fut: Future<Output = RedisResult<T>>,
    {
        let Some(conn) = self.connection().await else {
            warn!(operation, key, "redis cache unavailable, skipping");
            return None;
        };

        match tokio::time::timeout(self.config.command_timeout, command(conn)).await {
            Ok(Ok(value)) => {
                self.mark_connected();
                Some(value)
            }
            Ok(Err(err)) => {
                if is_connection_error(&err) {
                    self.mark_failed();
                }
                error!(operation, key, error = %err, "redis command failed");
                None
            }
            Err(_) => {
                self.mark_failed();
                error!(operation, key, "redis command timed out");
                None
            }
        }
    }
}

fn is_connection_error(err: &RedisError) -> bool {
    err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() || err.is_timeout()
}

impl CacheStore for RedisCacheStore {
    fn get_raw<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<String>> {
        Box::pin(async move {
            let value = self
                .run("get", key, |mut conn| async move {
                    let value: Option<String> = conn.get(key).await?;
                    Ok::<_, RedisError>(value)
                })
                .await
                .flatten();
            if value.is_none() {
                debug!(key, "cache miss");
            }
            value
        })
    }

    fn set_raw<'a>(&'a self, key: &'a str, value: String, ttl: Ttl) -> CacheFuture<'a, ()> {
        Box::pin(async move {
            let stored = self
                .run("set", key, |mut conn| async move {
                    let _: () = conn.set_ex(key, value, ttl.as_secs()).await?;
                    Ok::<_, RedisError>(())
                })
                .await;
            if stored.is_some() {
                debug!(key, ttl_secs = ttl.as_secs(), "cache entry stored");
            }
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> CacheFuture<'a, ()> {
        Box::pin(async move {
            self.run("delete", key, |mut conn| async move {
                let _: i64 = conn.del(key).await?;
                Ok::<_, RedisError>(())
            })
            .await;
        })
    }

    fn exists<'a>(&'a self, key: &'a str) -> CacheFuture<'a, bool> {
        Box::pin(async move {
            self.run("exists", key, |mut conn| async move {
                let exists: bool = conn.exists(key).await?;
                Ok::<_, RedisError>(exists)
            })
            .await
            .unwrap_or(false)
        })
    }

    fn clear(&self) -> CacheFuture<'_, bool> {
        Box::pin(async move {
            let cleared = self
                .run("clear", "*", |mut conn| async move {
                    let _: () = redis::cmd("FLUSHDB").query_async(&mut conn).await?;
                    Ok::<_, RedisError>(())
                })
                .await
                .is_some();
            if cleared {
                info!("redis cache cleared");
            }
            cleared
        })
    }

    fn expire<'a>(&'a self, key: &'a str, ttl: Ttl) -> CacheFuture<'a, ()> {
        Box::pin(async move {
            let secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
            self.run("expire", key, |mut conn| async move {
                let _: bool = conn.expire(key, secs).await?;
                Ok::<_, RedisError>(())
            })
            .await;
        })
    }

    fn connection_state(&self) -> ConnectionState {
        self.state()
    }
}
