//! Plan computation and the caching engine front-end.
//!
//! `compute_trade_plan` is the pure core: bars in, plan out, no I/O, no
//! clock, no global state. Identical inputs produce identical plans.
//!
//! `PlanEngine` wraps that core with the live-request plumbing: cached
//! fetches for all three horizon depths in parallel, retry on transient
//! failures, and single-flight deduplication so concurrent requests for
//! one (symbol, horizon) pair hit the provider once.

use std::sync::Arc;

use thiserror::Error;

use crate::analysis::{
    classify_setup, confidence_level, confidence_score, enforce_hierarchy, find_swing_low,
    resolve_stop, resolve_stop_with_fallback, score_signals, suggested_position_size, targets_for,
    HorizonStops, MarketContext, SizingInputs, ATR_PERIOD,
};
use crate::data::{BarCache, BarProvider, FetchError, Interval, RetryPolicy, SingleFlightGroup};
use crate::domain::{
    DataInsufficient, EntryZone, Horizon, PlanMetrics, PriceBar, PriceHistory, RiskManagement,
    StopLoss, SwingPivot, TradePlan,
};
use crate::indicators::atr_proxy;

/// Entry band half-width as a fraction of current price.
const ENTRY_ZONE_WIDTH: f64 = 0.01;

/// Daily bars fetched per horizon. Long-term needs roughly a year to
/// cover its 41-bar pivot window plus the 52-week levels.
const SWING_OUTPUTSIZE: usize = 60;
const POSITIONAL_OUTPUTSIZE: usize = 120;
const LONGTERM_OUTPUTSIZE: usize = 250;

fn outputsize_for(horizon: Horizon) -> usize {
    match horizon {
        Horizon::Swing => SWING_OUTPUTSIZE,
        Horizon::Positional => POSITIONAL_OUTPUTSIZE,
        Horizon::LongTerm => LONGTERM_OUTPUTSIZE,
    }
}

/// Plan generation errors. `Clone` so a shared single-flight result can
/// fan out to every waiting caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error(transparent)]
    Data(#[from] DataInsufficient),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Compute a trade plan from bars already in hand.
///
/// Pure and deterministic. All three horizon stops are resolved from the
/// same bars so the cross-horizon ordering can be enforced before the
/// requested horizon's stop is read out.
pub fn compute_trade_plan(
    symbol: &str,
    current_price: f64,
    bars: &[PriceBar],
    horizon: Horizon,
) -> Result<TradePlan, PlanError> {
    let history = PriceHistory::from_bars(bars.to_vec())?;
    let current = if current_price > 0.0 {
        current_price
    } else {
        history.last_close()
    };
    let atr = atr_proxy(history.closes(), ATR_PERIOD);

    let stop_for = |h: Horizon| {
        let pivot = pivot_for(&history, h);
        resolve_stop(current, pivot, atr, h)
    };
    let stops = enforce_hierarchy(
        HorizonStops {
            swing: stop_for(Horizon::Swing),
            positional: stop_for(Horizon::Positional),
            longterm: stop_for(Horizon::LongTerm),
        },
        current,
    );

    let (_, risk_warning) =
        resolve_stop_with_fallback(current, pivot_for(&history, horizon), atr, horizon);

    Ok(assemble_plan(
        symbol,
        current,
        &history,
        horizon,
        *stops.get(horizon),
        risk_warning,
    ))
}

fn pivot_for(history: &PriceHistory, horizon: Horizon) -> Option<SwingPivot> {
    let params = horizon.params();
    find_swing_low(history.bars(), params.pivot_left, params.pivot_right)
}

/// Shared assembler: stop already resolved, everything downstream of it
/// derived here in one place.
fn assemble_plan(
    symbol: &str,
    current: f64,
    history: &PriceHistory,
    horizon: Horizon,
    stop: StopLoss,
    risk_warning: bool,
) -> TradePlan {
    let ctx = MarketContext::from_history(history);
    let volume_confirmed = ctx.volume_confirmed();
    let setup = classify_setup(history, &ctx);

    let (targets, risk_reward_ratio) = targets_for(current, &stop, horizon);
    let risk_per_share = current - stop.price;

    let score = confidence_score(history, &ctx, setup, risk_per_share, volume_confirmed, horizon);
    let level = confidence_level(score, risk_reward_ratio, volume_confirmed);

    let position_size = suggested_position_size(&SizingInputs {
        current_price: current,
        stop_distance: risk_per_share,
        confidence: level,
        atr: ctx.atr,
        volume_confirmed,
    });

    let signals = score_signals(history, &ctx, horizon);

    TradePlan {
        symbol: symbol.to_string(),
        current_price: current,
        direction: signals.direction(),
        horizon,
        confidence_level: level,
        setup_type: setup,
        risk_management: RiskManagement {
            entry_zone: EntryZone {
                low: current * (1.0 - ENTRY_ZONE_WIDTH),
                high: current * (1.0 + ENTRY_ZONE_WIDTH),
            },
            initial_stop_loss: stop,
            targets,
            risk_reward_ratio,
            suggested_position_size: position_size,
            probability_score: score,
            volume_confirmation: volume_confirmed,
            risk_warning,
        },
        indicators: signals.readings,
        metrics: PlanMetrics {
            atr: ctx.atr,
            atr_percent: if current > 0.0 { ctx.atr / current } else { 0.0 },
            support: ctx.support,
            resistance: ctx.resistance,
            average_volume: ctx.average_volume,
            fifty_two_week_low: ctx.fifty_two_week_low,
            fifty_two_week_high: ctx.fifty_two_week_high,
        },
    }
}

/// Live-request engine: fetch, cache, dedup, retry, plan.
pub struct PlanEngine {
    provider: Arc<dyn BarProvider>,
    cache: BarCache,
    flights: SingleFlightGroup<String, Result<TradePlan, PlanError>>,
    retry: RetryPolicy,
}

impl PlanEngine {
    pub fn new(provider: Arc<dyn BarProvider>) -> Self {
        Self {
            provider,
            cache: BarCache::with_defaults(),
            flights: SingleFlightGroup::new(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_cache(mut self, cache: BarCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Generate a plan for one (symbol, horizon) pair.
    ///
    /// Concurrent calls for the same pair share one computation; the
    /// shared result (success or error) fans out to every caller.
    pub fn plan(&self, symbol: &str, horizon: Horizon) -> Result<TradePlan, PlanError> {
        let key = format!("{symbol}:{}", horizon.as_str());
        self.flights.run(key, || self.plan_uncached(symbol, horizon))
    }

    fn plan_uncached(&self, symbol: &str, horizon: Horizon) -> Result<TradePlan, PlanError> {
        // All three depths fetched in parallel. Each feeds one horizon's
        // stop so the hierarchy reflects each horizon's own structure.
        let (swing_bars, (positional_bars, longterm_bars)) = rayon::join(
            || self.fetch_bars(symbol, Horizon::Swing),
            || {
                rayon::join(
                    || self.fetch_bars(symbol, Horizon::Positional),
                    || self.fetch_bars(symbol, Horizon::LongTerm),
                )
            },
        );

        // The requested horizon's bars are mandatory; a sibling horizon's
        // fetch failure degrades that stop to the ATR fallback instead of
        // failing the whole plan.
        let requested = match horizon {
            Horizon::Swing => &swing_bars,
            Horizon::Positional => &positional_bars,
            Horizon::LongTerm => &longterm_bars,
        };
        let requested = requested.as_ref().map_err(|e| e.clone())?;
        let history = PriceHistory::from_bars((**requested).clone())?;
        let current = history.last_close();
        let atr = atr_proxy(history.closes(), ATR_PERIOD);

        let stop_for = |h: Horizon, bars: &Result<Arc<Vec<PriceBar>>, FetchError>| match bars {
            Ok(bars) => match PriceHistory::from_bars((**bars).clone()) {
                Ok(hist) => {
                    let h_atr = atr_proxy(hist.closes(), ATR_PERIOD);
                    resolve_stop(current, pivot_for(&hist, h), h_atr, h)
                }
                Err(_) => resolve_stop(current, None, atr, h),
            },
            Err(_) => resolve_stop(current, None, atr, h),
        };

        let stops = enforce_hierarchy(
            HorizonStops {
                swing: stop_for(Horizon::Swing, &swing_bars),
                positional: stop_for(Horizon::Positional, &positional_bars),
                longterm: stop_for(Horizon::LongTerm, &longterm_bars),
            },
            current,
        );

        let (_, risk_warning) =
            resolve_stop_with_fallback(current, pivot_for(&history, horizon), atr, horizon);

        Ok(assemble_plan(
            symbol,
            current,
            &history,
            horizon,
            *stops.get(horizon),
            risk_warning,
        ))
    }

    fn fetch_bars(&self, symbol: &str, horizon: Horizon) -> Result<Arc<Vec<PriceBar>>, FetchError> {
        let outputsize = outputsize_for(horizon);
        let key = format!("{symbol}:{}:{outputsize}", Interval::Daily.as_query());
        if let Some(bars) = self.cache.get(&key) {
            return Ok(bars);
        }
        let bars = self
            .retry
            .run(|| self.provider.fetch(symbol, Interval::Daily, outputsize))?;
        Ok(self.cache.put(key, bars))
    }
}
