//! Bar provider trait, structured fetch errors, and the retry policy.
//!
//! The `BarProvider` trait abstracts over data sources so the engine can
//! swap implementations and mock for tests. Error payloads are plain
//! strings so `FetchError` stays `Clone` across the single-flight
//! boundary.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PriceBar;

/// Bar interval supported by the fetch contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    Daily,
    Weekly,
}

impl Interval {
    /// Wire name used in provider query strings.
    pub fn as_query(&self) -> &'static str {
        match self {
            Interval::Daily => "1day",
            Interval::Weekly => "1week",
        }
    }
}

/// Structured error types for bar fetching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("fetch failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    #[error("fetch error: {0}")]
    Other(String),
}

impl FetchError {
    /// Transient errors are worth retrying; structural ones are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FetchError::NetworkUnreachable(_)
                | FetchError::RateLimited { .. }
                | FetchError::Other(_)
        )
    }
}

/// Trait for bar data sources.
///
/// Implementations return bars ordered oldest→newest (reversing the
/// provider's newest-first wire order where needed).
pub trait BarProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch up to `outputsize` bars for a symbol at the given interval.
    fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        outputsize: usize,
    ) -> Result<Vec<PriceBar>, FetchError>;
}

/// Fixed-delay retry: every transient failure waits the same delay and
/// tries again, up to `attempts` total tries.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Run `op` under this policy. Non-transient errors return
    /// immediately; exhaustion wraps the last transient error.
    pub fn run<T>(
        &self,
        mut op: impl FnMut() -> Result<T, FetchError>,
    ) -> Result<T, FetchError> {
        let mut last: Option<FetchError> = None;

        for attempt in 0..self.attempts {
            if attempt > 0 {
                std::thread::sleep(self.delay);
            }
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() => last = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(FetchError::RetriesExhausted {
            attempts: self.attempts,
            last: last
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempts made".to_string()),
        })
    }
}
