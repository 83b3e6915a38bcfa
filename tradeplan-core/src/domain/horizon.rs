//! Holding-period horizons and their risk parameter tables.
//!
//! The three horizons form a total order in risk looseness:
//! Swing < Positional < LongTerm. Shorter horizons use tighter pivot
//! lookbacks, smaller buffers, and lower risk caps.

use serde::{Deserialize, Serialize};

/// Intended holding-period bucket for a trade plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizon {
    Swing,
    Positional,
    #[serde(rename = "longterm")]
    LongTerm,
}

impl Horizon {
    /// All horizons, shortest to longest.
    pub const ALL: [Horizon; 3] = [Horizon::Swing, Horizon::Positional, Horizon::LongTerm];

    pub fn params(&self) -> &'static RiskParams {
        match self {
            Horizon::Swing => &SWING_PARAMS,
            Horizon::Positional => &POSITIONAL_PARAMS,
            Horizon::LongTerm => &LONGTERM_PARAMS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Horizon::Swing => "swing",
            Horizon::Positional => "positional",
            Horizon::LongTerm => "longterm",
        }
    }
}

/// Per-horizon risk-management constants.
///
/// All fractional fields are expressed as fractions of current price
/// (0.02 = 2%), not percentage points.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskParams {
    /// Symmetric pivot lookback: bars required on each side of a swing low.
    pub pivot_left: usize,
    pub pivot_right: usize,

    /// Buffer placed below a detected swing low.
    pub stop_buffer: f64,

    /// Minimum stop distance from current price.
    pub min_stop_distance: f64,

    /// Maximum stop distance from current price (risk cap).
    pub max_stop_distance: f64,

    /// Stop distance in ATRs when no qualifying pivot exists.
    pub atr_fallback_mult: f64,

    /// Profit-target multipliers applied to risk-per-share, tier 0..2.
    pub target_mults: [f64; 3],
}

impl RiskParams {
    /// Bars needed for pivot detection at this horizon.
    pub fn pivot_window(&self) -> usize {
        self.pivot_left + self.pivot_right + 1
    }

    /// Risk cap in percentage points (8% cap → 8.0).
    pub fn max_risk_percent(&self) -> f64 {
        self.max_stop_distance * 100.0
    }
}

pub static SWING_PARAMS: RiskParams = RiskParams {
    pivot_left: 5,
    pivot_right: 5,
    stop_buffer: 0.005,
    min_stop_distance: 0.02,
    max_stop_distance: 0.08,
    atr_fallback_mult: 1.5,
    target_mults: [1.5, 2.5, 4.0],
};

pub static POSITIONAL_PARAMS: RiskParams = RiskParams {
    pivot_left: 10,
    pivot_right: 10,
    stop_buffer: 0.015,
    min_stop_distance: 0.05,
    max_stop_distance: 0.15,
    atr_fallback_mult: 2.0,
    target_mults: [2.0, 3.0, 5.0],
};

pub static LONGTERM_PARAMS: RiskParams = RiskParams {
    pivot_left: 20,
    pivot_right: 20,
    stop_buffer: 0.025,
    min_stop_distance: 0.08,
    max_stop_distance: 0.25,
    atr_fallback_mult: 2.5,
    target_mults: [2.5, 4.0, 6.0],
};
