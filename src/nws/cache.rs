//! Expiring, single-flight cache used by the zone catalog.
//!
//! The catalog depends on the [`ExpiringCache`] trait rather than on a
//! concrete store, so an in-memory cache can be swapped for a shared one
//! without touching the loader.

use moka::future::Cache;
use moka::Expiry;
use std::future::Future;
use std::time::{Duration, Instant};

/// Result of a cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLookup<V> {
    pub value: V,
    /// `false` when this call ran the populate future.
    pub hit: bool,
}

/// Get-or-populate with absolute expiration.
///
/// Implementations must run `populate` at most once per key while an entry is
/// being filled; concurrent callers wait for that single computation.
pub trait ExpiringCache<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    fn get_or_populate<F>(
        &self,
        key: &str,
        ttl: Duration,
        populate: F,
    ) -> impl Future<Output = CacheLookup<V>> + Send
    where
        F: Future<Output = V> + Send;
}

#[derive(Clone)]
struct Expiring<V> {
    value: V,
    ttl: Duration,
}

/// Expires each entry after the TTL it was inserted with.
struct PerEntryTtl;

impl<V> Expiry<String, Expiring<V>> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Expiring<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process [`ExpiringCache`] backed by moka.
#[derive(Clone)]
pub struct MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<String, Expiring<V>>,
}

impl<V> MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }

    pub async fn invalidate(&self, key: &str) {
        self.inner.invalidate(key).await;
    }
}

impl<V> Default for MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(64)
    }
}

impl<V> ExpiringCache<V> for MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get_or_populate<F>(&self, key: &str, ttl: Duration, populate: F) -> CacheLookup<V>
    where
        F: Future<Output = V> + Send,
    {
        let entry = self
            .inner
            .entry_by_ref(key)
            .or_insert_with(async move {
                Expiring {
                    value: populate.await,
                    ttl,
                }
            })
            .await;

        CacheLookup {
            hit: !entry.is_fresh(),
            value: entry.into_value().value,
        }
    }
}
