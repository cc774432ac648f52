//! Short-lived lookup cache with per-key request coalescing.
//!
//! Availability drifts, so entries expire after a TTL rather than being
//! invalidated. Concurrent lookups for the same key share one in-flight
//! request through a `OnceCell` slot.

use crate::shop::models::ScrapeResult;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

struct Slot {
    created: Instant,
    cell: Arc<OnceCell<ScrapeResult>>,
}

pub struct DetailsCache {
    ttl: Duration,
    slots: Mutex<HashMap<String, Slot>>,
}

impl DetailsCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, slots: Mutex::new(HashMap::new()) }
    }

    /// Returns the cached result for `key`, or runs `lookup` to produce
    /// one. While a lookup is in flight, further callers for the same key
    /// await it instead of issuing their own.
    pub async fn get_or_lookup<F, Fut>(&self, key: &str, lookup: F) -> ScrapeResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ScrapeResult>,
    {
        let cell = {
            let mut slots = self.slots.lock().await;
            match slots.get(key) {
                Some(slot) if slot.created.elapsed() < self.ttl => {
                    debug!("Cache slot reused for {}", key);
                    Arc::clone(&slot.cell)
                }
                _ => {
                    let cell = Arc::new(OnceCell::new());
                    slots.insert(
                        key.to_string(),
                        Slot { created: Instant::now(), cell: Arc::clone(&cell) },
                    );
                    cell
                }
            }
        };

        cell.get_or_init(lookup).await.clone()
    }
}
