//! Round-robin API key rotation.
//!
//! Replaces a module-global rotation counter with an explicit,
//! constructor-injected service so tests can observe rotation order.

use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug)]
pub struct KeyRotator {
    keys: Vec<String>,
    next: AtomicUsize,
}

impl KeyRotator {
    pub fn new(keys: Vec<String>) -> Self {
        assert!(!keys.is_empty(), "KeyRotator requires at least one key");
        Self {
            keys,
            next: AtomicUsize::new(0),
        }
    }

    pub fn single(key: impl Into<String>) -> Self {
        Self::new(vec![key.into()])
    }

    /// Next key in round-robin order. Safe under concurrent callers;
    /// each call advances the cursor exactly once.
    pub fn next_key(&self) -> &str {
        let i = self.next.fetch_add(1, Ordering::Relaxed);
        &self.keys[i % self.keys.len()]
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        false // constructor guarantees at least one key
    }
}
