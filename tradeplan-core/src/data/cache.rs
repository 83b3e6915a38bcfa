//! In-memory TTL cache for fetched bar series.
//!
//! Append/overwrite-only, keyed by request string, TTL checked on read.
//! The clock is injected so tests can advance time without sleeping.
//! When full, the oldest entry is evicted on insert.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::domain::PriceBar;

/// Time source abstraction for TTL checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Real wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct Entry {
    bars: Arc<Vec<PriceBar>>,
    inserted_at: Instant,
}

/// TTL-bounded bar cache.
pub struct BarCache {
    entries: Mutex<HashMap<String, Entry>>,
    ttl: Duration,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl BarCache {
    /// Default TTL matching the upstream caching contract.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);
    pub const DEFAULT_CAPACITY: usize = 512;

    pub fn new(ttl: Duration, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        assert!(capacity > 0, "cache capacity must be positive");
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            capacity,
            clock,
        }
    }

    /// 24-hour TTL, system clock.
    pub fn with_defaults() -> Self {
        Self::new(
            Self::DEFAULT_TTL,
            Self::DEFAULT_CAPACITY,
            Arc::new(SystemClock),
        )
    }

    /// Fetch a live entry; expired entries are dropped on sight.
    pub fn get(&self, key: &str) -> Option<Arc<Vec<PriceBar>>> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if self.clock.now().duration_since(entry.inserted_at) < self.ttl => {
                Some(Arc::clone(&entry.bars))
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert or overwrite. Evicts the oldest entry when at capacity.
    pub fn put(&self, key: impl Into<String>, bars: Vec<PriceBar>) -> Arc<Vec<PriceBar>> {
        let bars = Arc::new(bars);
        let key = key.into();
        let mut entries = self.entries.lock().unwrap();

        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key,
            Entry {
                bars: Arc::clone(&bars),
                inserted_at: self.clock.now(),
            },
        );
        bars
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
