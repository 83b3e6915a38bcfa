//! Position sizing.
//!
//! # Formula
//! ```text
//! risk_per_share_pct = stop_distance / current_price * 100
//! base = MAX_PORTFOLIO_RISK_PCT / max(risk_per_share_pct, ε) * 100, capped at 25
//! adjusted = base × confidence × volatility × volume
//! result = clamp(adjusted, 0.5, 25), rounded to 1 decimal
//! ```
//! Portfolio risk per trade is fixed at 0.5% regardless of horizon.

use crate::domain::ConfidenceLevel;

/// Maximum portfolio risk per trade, percent.
pub const MAX_PORTFOLIO_RISK_PCT: f64 = 0.5;

/// Allocation bounds, percent of portfolio.
pub const MIN_POSITION_PCT: f64 = 0.5;
pub const MAX_POSITION_PCT: f64 = 25.0;

/// ATR/price level above which the volatility haircut applies.
pub const HIGH_VOLATILITY_RATIO: f64 = 0.03;

const EPSILON: f64 = 1e-6;

/// Inputs to the sizer, gathered by the plan assembler.
#[derive(Debug, Clone, Copy)]
pub struct SizingInputs {
    pub current_price: f64,
    /// Distance from current price to the stop, in price units.
    pub stop_distance: f64,
    pub confidence: ConfidenceLevel,
    pub atr: f64,
    pub volume_confirmed: bool,
}

/// Suggested allocation in percent of portfolio, clamped to [0.5, 25].
pub fn suggested_position_size(inputs: &SizingInputs) -> f64 {
    if inputs.current_price <= 0.0 {
        return MIN_POSITION_PCT;
    }

    let risk_per_share_pct = (inputs.stop_distance / inputs.current_price * 100.0).max(EPSILON);
    let base = (MAX_PORTFOLIO_RISK_PCT / risk_per_share_pct * 100.0).min(MAX_POSITION_PCT);

    let confidence_mult = match inputs.confidence {
        ConfidenceLevel::High => 1.2,
        ConfidenceLevel::Medium => 1.0,
        ConfidenceLevel::Low => 0.7,
    };
    let volatility_mult = if inputs.atr / inputs.current_price > HIGH_VOLATILITY_RATIO {
        0.7
    } else {
        1.0
    };
    let volume_mult = if inputs.volume_confirmed { 1.1 } else { 0.9 };

    let adjusted = base * confidence_mult * volatility_mult * volume_mult;
    let clamped = adjusted.clamp(MIN_POSITION_PCT, MAX_POSITION_PCT);
    (clamped * 10.0).round() / 10.0
}
