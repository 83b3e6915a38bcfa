//! Domain types for the trade-plan engine.

pub mod bar;
pub mod horizon;
pub mod plan;

pub use bar::{DataInsufficient, PriceBar, PriceHistory};
pub use horizon::{Horizon, RiskParams};
pub use plan::{
    ConfidenceLevel, Direction, EntryZone, IndicatorReading, PlanMetrics, RiskManagement,
    SetupType, StopLoss, StopLossMethod, SwingPivot, Target, TradePlan,
};

/// Symbol type alias
pub type Symbol = String;
