//! Trade-plan result types — the engine's output contract.
//!
//! Downstream collaborators (cache layer, web renderer) serialize these
//! verbatim and must never recompute a risk figure, so every derived
//! number lives here in its final form. Field names serialize in
//! camelCase to match the consuming API shape.

use serde::{Deserialize, Serialize};

use crate::domain::Horizon;

/// A local minimum of `low` detected inside a symmetric lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingPivot {
    pub price: f64,
    pub index: usize,
}

/// How a stop-loss price was derived.
///
/// An enum rather than a free-form string so consumers can match
/// exhaustively instead of comparing method names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopLossMethod {
    SwingLowPivot,
    MinimumDistanceEnforced,
    MaximumRiskEnforced,
    HierarchyEnforced,
    AtrFallback,
}

/// A resolved stop-loss for one horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopLoss {
    pub price: f64,
    pub method: StopLossMethod,
    /// Distance from current price, in percentage points. Always >= 0 for
    /// long setups (stop sits below current price).
    pub risk_percent: f64,
    pub horizon: Horizon,
}

impl StopLoss {
    /// Recompute `risk_percent` for a (possibly adjusted) stop price.
    pub fn risk_percent_at(current_price: f64, stop_price: f64) -> f64 {
        if current_price <= 0.0 {
            return 0.0;
        }
        (current_price - stop_price) / current_price * 100.0
    }
}

/// One profit target tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub price: f64,
    /// Win probability estimate, 0–100.
    pub probability: f64,
    pub risk_reward_ratio: f64,
}

/// Suggested entry band around the current price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryZone {
    pub low: f64,
    pub high: f64,
}

/// Aggregate risk figures for a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskManagement {
    pub entry_zone: EntryZone,
    pub initial_stop_loss: StopLoss,
    pub targets: [Target; 3],
    /// Headline ratio: reward/risk of the highest-probability target,
    /// rounded to 2 decimals.
    pub risk_reward_ratio: f64,
    /// Suggested allocation, percent of portfolio, clamped to [0.5, 25].
    pub suggested_position_size: f64,
    /// Confidence score, 0–100.
    pub probability_score: f64,
    pub volume_confirmation: bool,
    /// Set when even the ATR fallback could not bring risk under the
    /// horizon cap. The plan is still generated.
    pub risk_warning: bool,
}

/// Overall directional read of the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

/// Setup archetype, first-match-wins during classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupType {
    BullishBreakout,
    SupportBounce,
    TrendContinuation,
}

/// A named indicator value with its directional read, for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReading {
    pub name: String,
    pub value: f64,
    pub signal: Direction,
}

/// Derived levels and context figures the classifier worked from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanMetrics {
    pub atr: f64,
    /// ATR as a fraction of current price.
    pub atr_percent: f64,
    pub support: f64,
    pub resistance: f64,
    pub average_volume: f64,
    pub fifty_two_week_low: f64,
    pub fifty_two_week_high: f64,
}

/// The top-level result: one immutable plan per (symbol, horizon) request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePlan {
    pub symbol: String,
    pub current_price: f64,
    pub direction: Direction,
    pub horizon: Horizon,
    pub confidence_level: ConfidenceLevel,
    pub setup_type: SetupType,
    pub risk_management: RiskManagement,
    pub indicators: Vec<IndicatorReading>,
    pub metrics: PlanMetrics,
}
