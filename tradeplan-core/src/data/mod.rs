//! Data plumbing: provider trait, HTTP client, retry, cache, key
//! rotation, request deduplication, and the raw-bar normalizer.
//!
//! The cache layer sits above the provider trait — providers don't know
//! about the cache, and neither knows about the engine.

pub mod cache;
pub mod key_rotator;
pub mod normalize;
pub mod provider;
pub mod single_flight;
pub mod twelvedata;

pub use cache::{BarCache, Clock, SystemClock};
pub use key_rotator::KeyRotator;
pub use normalize::{normalize, RawBarRecord};
pub use provider::{BarProvider, FetchError, Interval, RetryPolicy};
pub use single_flight::SingleFlightGroup;
pub use twelvedata::TwelveDataProvider;
