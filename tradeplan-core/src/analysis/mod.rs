//! Analysis pipeline: pivots → stops → targets → sizing → confidence.
//!
//! Everything here is pure computation over a normalized `PriceHistory`;
//! the engine module wires these stages together and owns the only I/O.

pub mod confidence;
pub mod pivot;
pub mod sizing;
pub mod stops;
pub mod targets;

pub use confidence::{
    classify_setup, confidence_level, confidence_score, score_signals, MarketContext, SignalScore,
    ATR_PERIOD,
};
pub use pivot::find_swing_low;
pub use sizing::{suggested_position_size, SizingInputs};
pub use stops::{enforce_hierarchy, resolve_stop, resolve_stop_with_fallback, HorizonStops};
pub use targets::targets_for;
