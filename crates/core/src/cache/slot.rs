//! Single-entry TTL cache with an injected clock.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clock::Clock;

/// The cached value and when it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub data: T,
    pub stored_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Age of the entry at `now`.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.stored_at
    }
}

/// One-slot, last-writer-wins cache.
///
/// Constructed once at process start and handed to the service that owns the
/// cached page.
pub struct SlotCache<T> {
    slot: RwLock<Option<CacheEntry<T>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<T: Clone> SlotCache<T> {
    pub fn new(ttl: std::time::Duration, clock: Arc<dyn Clock>) -> Self {
        let ttl = Duration::from_std(ttl).unwrap_or(Duration::MAX);
        Self { slot: RwLock::new(None), ttl, clock }
    }

    /// Return the cached value when it is strictly younger than the TTL.
    pub async fn get(&self) -> Option<T> {
        let slot = self.slot.read().await;
        let entry = slot.as_ref()?;
        let age = entry.age(self.clock.now());
        if age < self.ttl {
            tracing::debug!(age_ms = age.num_milliseconds(), "page cache hit");
            Some(entry.data.clone())
        } else {
            tracing::debug!(age_ms = age.num_milliseconds(), "page cache expired");
            None
        }
    }

    /// Overwrite the slot with `data`, stamped with the current clock time.
    pub async fn put(&self, data: T) {
        let mut slot = self.slot.write().await;
        *slot = Some(CacheEntry { data, stored_at: self.clock.now() });
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}
