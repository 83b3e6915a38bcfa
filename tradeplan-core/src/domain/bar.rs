//! PriceBar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLCV bar for a single symbol on a single day (or week).
///
/// Bars are immutable once constructed and always ordered oldest→newest
/// inside a `PriceHistory`. Dates are assumed unique; gaps (holidays,
/// halts) are tolerated and never interpolated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// Basic OHLC sanity check: high is the top of the bar, low the bottom,
    /// prices are positive and finite.
    pub fn is_sane(&self) -> bool {
        let finite = [self.open, self.high, self.low, self.close]
            .iter()
            .all(|v| v.is_finite());
        finite
            && self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }
}

/// Raised when a price history is structurally too short to analyze.
///
/// This is the one fatal error in the engine: everything else degrades to
/// an ATR fallback or a warning flag instead of blocking plan generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("insufficient price history: need at least {needed} bars, got {got}")]
pub struct DataInsufficient {
    pub needed: usize,
    pub got: usize,
}

/// Validated, oldest→newest price history with derived series.
///
/// The derived `closes` and `volumes` vectors are computed once at
/// construction so the indicator layer works on plain slices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    bars: Vec<PriceBar>,
    closes: Vec<f64>,
    volumes: Vec<f64>,
}

impl PriceHistory {
    /// Minimum number of bars required for any analysis.
    pub const MIN_BARS: usize = 2;

    /// Build a history from already-typed bars.
    ///
    /// Bars arriving newest-first (the usual API order) are reversed;
    /// order is detected from the first and last dates. Insane bars are
    /// dropped rather than propagated into the indicator math.
    pub fn from_bars(mut bars: Vec<PriceBar>) -> Result<Self, DataInsufficient> {
        if bars.len() >= 2 && bars.first().map(|b| b.date) > bars.last().map(|b| b.date) {
            bars.reverse();
        }
        bars.retain(PriceBar::is_sane);

        if bars.len() < Self::MIN_BARS {
            return Err(DataInsufficient {
                needed: Self::MIN_BARS,
                got: bars.len(),
            });
        }

        let closes = bars.iter().map(|b| b.close).collect();
        let volumes = bars.iter().map(|b| b.volume as f64).collect();
        Ok(Self {
            bars,
            closes,
            volumes,
        })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn volumes(&self) -> &[f64] {
        &self.volumes
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Close of the most recent bar.
    pub fn last_close(&self) -> f64 {
        self.closes[self.closes.len() - 1]
    }
}
