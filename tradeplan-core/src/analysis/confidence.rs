//! Setup classification, confidence scoring, and directional signals.
//!
//! One parameterized scorer serves all three horizons; horizon flavor
//! comes in through weight tables (swing leans on volume and setup
//! quality, long-term on trend and price structure) instead of three
//! near-duplicate scoring functions.

use crate::domain::{
    ConfidenceLevel, Direction, Horizon, IndicatorReading, PriceHistory, SetupType,
};
use crate::indicators::{atr_proxy, bollinger, ema, macd, rsi, sma_last};

/// Window for support/resistance scans, bars.
const LEVEL_LOOKBACK: usize = 20;

/// Trading days in a year, for 52-week levels.
const YEAR_LOOKBACK: usize = 252;

/// Volume spike threshold relative to the 20-bar average.
const VOLUME_SPIKE_RATIO: f64 = 1.5;

/// ATR period shared by the classifier and the plan assembler.
pub const ATR_PERIOD: usize = 14;

/// Derived levels the classifier and scorer work from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketContext {
    /// Lowest low over the trailing window, excluding the current bar.
    pub support: f64,
    /// Highest high over the trailing window, excluding the current bar.
    pub resistance: f64,
    pub atr: f64,
    /// 20-bar average volume.
    pub average_volume: f64,
    pub last_volume: f64,
    pub fifty_two_week_low: f64,
    pub fifty_two_week_high: f64,
}

impl MarketContext {
    pub fn from_history(history: &PriceHistory) -> Self {
        let bars = history.bars();
        let n = bars.len();

        // Levels exclude the current bar so a breakout close can actually
        // clear its own resistance.
        let level_slice = &bars[n.saturating_sub(LEVEL_LOOKBACK + 1)..n - 1];
        let (support, resistance) = if level_slice.is_empty() {
            (bars[n - 1].low, bars[n - 1].high)
        } else {
            level_slice.iter().fold(
                (f64::INFINITY, f64::NEG_INFINITY),
                |(lo, hi), b| (lo.min(b.low), hi.max(b.high)),
            )
        };

        let year_slice = &bars[n.saturating_sub(YEAR_LOOKBACK)..];
        let (year_low, year_high) = year_slice.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), b| (lo.min(b.low), hi.max(b.high)),
        );

        let volumes = history.volumes();
        let average_volume = if volumes.len() >= LEVEL_LOOKBACK {
            sma_last(volumes, LEVEL_LOOKBACK)
        } else {
            volumes.iter().sum::<f64>() / volumes.len() as f64
        };

        Self {
            support,
            resistance,
            atr: atr_proxy(history.closes(), ATR_PERIOD),
            average_volume,
            last_volume: *volumes.last().unwrap_or(&0.0),
            fifty_two_week_low: year_low,
            fifty_two_week_high: year_high,
        }
    }

    /// Recent volume spike: last volume clears 1.5× the 20-bar average.
    pub fn volume_confirmed(&self) -> bool {
        self.average_volume > 0.0 && self.last_volume > VOLUME_SPIKE_RATIO * self.average_volume
    }
}

/// Classify the setup archetype. Priority order, first match wins;
/// anything unclassifiable defaults to a breakout read.
pub fn classify_setup(history: &PriceHistory, ctx: &MarketContext) -> SetupType {
    let bars = history.bars();
    let last = &bars[bars.len() - 1];

    if last.close > ctx.resistance && ctx.volume_confirmed() {
        return SetupType::BullishBreakout;
    }

    let near_support = (last.close - ctx.support).abs() <= 0.5 * ctx.atr;
    let green = last.close > last.open;
    let above_avg_volume = ctx.average_volume > 0.0 && ctx.last_volume > ctx.average_volume;
    if near_support && green && above_avg_volume {
        return SetupType::SupportBounce;
    }

    if bars.len() >= 2 {
        let prev = &bars[bars.len() - 2];
        let closes = history.closes();
        let ema20 = *ema(closes, 20).last().unwrap_or(&0.0);
        let ema50 = *ema(closes, 50).last().unwrap_or(&0.0);
        let inside_bar = last.high < prev.high && last.low > prev.low;
        if ema20 > ema50 && inside_bar && last.close > prev.close {
            return SetupType::TrendContinuation;
        }
    }

    SetupType::BullishBreakout
}

/// Horizon-specific term weights for the confidence score.
#[derive(Debug, Clone, Copy)]
struct ScoreWeights {
    setup: f64,
    volume: f64,
    trend: f64,
    price_action: f64,
    risk_reward: f64,
}

fn weights_for(horizon: Horizon) -> ScoreWeights {
    match horizon {
        // Short horizons live and die on participation and setup quality.
        Horizon::Swing => ScoreWeights {
            setup: 1.2,
            volume: 1.2,
            trend: 0.9,
            price_action: 0.9,
            risk_reward: 1.0,
        },
        Horizon::Positional => ScoreWeights {
            setup: 1.0,
            volume: 1.0,
            trend: 1.0,
            price_action: 1.0,
            risk_reward: 1.0,
        },
        // Long horizons care about the larger structure.
        Horizon::LongTerm => ScoreWeights {
            setup: 0.9,
            volume: 0.8,
            trend: 1.2,
            price_action: 1.2,
            risk_reward: 1.0,
        },
    }
}

/// Weighted confidence score in [0, 100].
pub fn confidence_score(
    history: &PriceHistory,
    ctx: &MarketContext,
    setup: SetupType,
    risk_per_share: f64,
    volume_confirmed: bool,
    horizon: Horizon,
) -> f64 {
    let w = weights_for(horizon);
    let closes = history.closes();
    let last_close = history.last_close();
    let mut score = 0.0;

    score += w.setup
        * match setup {
            SetupType::BullishBreakout => 25.0,
            SetupType::SupportBounce => 20.0,
            SetupType::TrendContinuation => 15.0,
        };

    if volume_confirmed {
        score += w.volume * 20.0;
    }

    let ema20 = *ema(closes, 20).last().unwrap_or(&0.0);
    let ema50 = *ema(closes, 50).last().unwrap_or(&0.0);
    if ema20 > ema50 {
        score += w.trend * 15.0;
    }
    if closes.len() >= 200 && last_close > sma_last(closes, 200) {
        score += w.trend * 10.0;
    }

    if ctx.fifty_two_week_low.is_finite() && last_close > 1.5 * ctx.fifty_two_week_low {
        score += w.price_action * 10.0;
    }
    if last_close > ctx.support + ctx.atr {
        score += w.price_action * 10.0;
    }

    // Room check: does 2.5× the risk fit below resistance?
    if last_close + 2.5 * risk_per_share <= ctx.resistance {
        score += w.risk_reward * 10.0;
    }

    score.clamp(0.0, 100.0)
}

/// Map score + headline R:R + volume into a confidence level.
pub fn confidence_level(score: f64, risk_reward: f64, volume_confirmed: bool) -> ConfidenceLevel {
    if score >= 70.0 && risk_reward >= 2.0 && volume_confirmed {
        ConfidenceLevel::High
    } else if score >= 50.0 && risk_reward >= 1.5 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

/// Bullish/bearish signal tally plus the display readings derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalScore {
    pub bullish: u32,
    pub bearish: u32,
    pub readings: Vec<IndicatorReading>,
}

impl SignalScore {
    pub fn direction(&self) -> Direction {
        if self.bullish > self.bearish {
            Direction::Bullish
        } else if self.bearish > self.bullish {
            Direction::Bearish
        } else {
            Direction::Neutral
        }
    }
}

/// Horizon-dependent moving-average pair for the trend signal.
fn trend_periods(horizon: Horizon) -> (usize, usize) {
    match horizon {
        Horizon::Swing => (10, 20),
        Horizon::Positional => (20, 50),
        Horizon::LongTerm => (50, 200),
    }
}

/// One parameterized signal counter for all horizons.
///
/// Each indicator contributes at most one tally and exactly one reading,
/// so the plan's indicator list lines up with what was counted.
pub fn score_signals(history: &PriceHistory, ctx: &MarketContext, horizon: Horizon) -> SignalScore {
    let closes = history.closes();
    let last_close = history.last_close();
    let mut bullish = 0u32;
    let mut bearish = 0u32;
    let mut readings = Vec::with_capacity(5);

    let mut tally = |name: &str, value: f64, signal: Direction| {
        match signal {
            Direction::Bullish => bullish += 1,
            Direction::Bearish => bearish += 1,
            Direction::Neutral => {}
        }
        readings.push(IndicatorReading {
            name: name.to_string(),
            value,
            signal,
        });
    };

    let rsi_last = *rsi(closes, 14).last().unwrap_or(&50.0);
    let rsi_signal = if rsi_last < 30.0 {
        Direction::Bullish
    } else if rsi_last > 70.0 {
        Direction::Bearish
    } else {
        Direction::Neutral
    };
    tally("rsi_14", rsi_last, rsi_signal);

    let hist = macd(closes).last_histogram();
    let macd_signal = if hist > 0.0 {
        Direction::Bullish
    } else if hist < 0.0 {
        Direction::Bearish
    } else {
        Direction::Neutral
    };
    tally("macd_histogram", hist, macd_signal);

    let (fast_p, slow_p) = trend_periods(horizon);
    let fast = *ema(closes, fast_p).last().unwrap_or(&0.0);
    let slow = *ema(closes, slow_p).last().unwrap_or(&0.0);
    let trend_signal = if fast > slow {
        Direction::Bullish
    } else if fast < slow {
        Direction::Bearish
    } else {
        Direction::Neutral
    };
    tally(&format!("ema_{fast_p}_{slow_p}"), fast - slow, trend_signal);

    let bands = bollinger(closes, 20, 2.0);
    let middle = *bands.middle.last().unwrap_or(&0.0);
    let bb_signal = if middle > 0.0 && last_close > middle {
        Direction::Bullish
    } else if middle > 0.0 && last_close < middle {
        Direction::Bearish
    } else {
        Direction::Neutral
    };
    tally("bollinger_middle", middle, bb_signal);

    let bars = history.bars();
    let last = &bars[bars.len() - 1];
    let volume_signal = if ctx.volume_confirmed() && last.close > last.open {
        Direction::Bullish
    } else if ctx.volume_confirmed() && last.close < last.open {
        Direction::Bearish
    } else {
        Direction::Neutral
    };
    tally("volume_ratio", ctx.last_volume / ctx.average_volume.max(1.0), volume_signal);

    SignalScore {
        bullish,
        bearish,
        readings,
    }
}
