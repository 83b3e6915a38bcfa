//! Trade-plan risk-management engine.
//!
//! Turns a symbol's price history into a structured trade plan:
//! - Domain types (bars, horizons, plans, stop-loss methods)
//! - Indicator calculators (SMA, EMA, RSI, MACD, Bollinger, ATR proxy)
//! - Analysis pipeline: swing-low pivots, the three-horizon stop
//!   hierarchy, profit targets, position sizing, confidence scoring
//! - Data plumbing: provider trait, TTL cache, retry, key rotation,
//!   single-flight request deduplication
//! - The engine itself: a pure `compute_trade_plan` core plus the
//!   caching `PlanEngine` front-end

pub mod analysis;
pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;

pub use domain::{Horizon, PriceBar, PriceHistory, TradePlan};
pub use engine::{compute_trade_plan, PlanEngine, PlanError};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything that crosses the worker-thread and
    /// single-flight boundaries is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::PriceBar>();
        require_sync::<domain::PriceBar>();
        require_send::<domain::PriceHistory>();
        require_sync::<domain::PriceHistory>();
        require_send::<domain::Horizon>();
        require_sync::<domain::Horizon>();
        require_send::<domain::TradePlan>();
        require_sync::<domain::TradePlan>();
        require_send::<domain::StopLoss>();
        require_sync::<domain::StopLoss>();

        require_send::<engine::PlanError>();
        require_sync::<engine::PlanError>();
        require_send::<data::FetchError>();
        require_sync::<data::FetchError>();

        require_send::<data::BarCache>();
        require_sync::<data::BarCache>();
        require_send::<data::KeyRotator>();
        require_sync::<data::KeyRotator>();
        require_send::<data::SingleFlightGroup<String, u32>>();
        require_sync::<data::SingleFlightGroup<String, u32>>();
        require_send::<engine::PlanEngine>();
        require_sync::<engine::PlanEngine>();
    }

    #[test]
    fn public_surface_compiles() {
        assert_send_sync();
    }
}
