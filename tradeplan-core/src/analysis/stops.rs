//! Stop-loss resolution and the cross-horizon hierarchy.
//!
//! Per horizon: buffer below the swing pivot (or ATR fallback without
//! one), then a minimum-distance raise and a maximum-risk clamp. After
//! all three horizons resolve independently, a two-pass fix-up enforces
//! `swing.price >= positional.price >= longterm.price`.
//!
//! The separate `resolve_stop_with_fallback` path implements the
//! live-request policy: it never clamps, preferring to annotate the plan
//! with a risk warning over blocking generation.

use crate::domain::{Horizon, StopLoss, StopLossMethod, SwingPivot};

/// Resolve one horizon's stop from a pivot (or ATR fallback), applying
/// both distance bounds.
pub fn resolve_stop(
    current_price: f64,
    pivot: Option<SwingPivot>,
    atr: f64,
    horizon: Horizon,
) -> StopLoss {
    let params = horizon.params();

    let (mut price, mut method) = match pivot {
        Some(p) => (p.price * (1.0 - params.stop_buffer), StopLossMethod::SwingLowPivot),
        None => (
            current_price - atr * params.atr_fallback_mult,
            StopLossMethod::AtrFallback,
        ),
    };

    let min_distance = params.min_stop_distance * current_price;
    let max_distance = params.max_stop_distance * current_price;

    if current_price - price < min_distance {
        price = current_price - min_distance;
        method = StopLossMethod::MinimumDistanceEnforced;
    }
    if current_price - price > max_distance {
        price = current_price - max_distance;
        method = StopLossMethod::MaximumRiskEnforced;
    }

    StopLoss {
        price,
        method,
        risk_percent: StopLoss::risk_percent_at(current_price, price),
        horizon,
    }
}

/// The live-request fallback policy.
///
/// Try the raw pivot stop; if its risk exceeds the horizon cap, try the
/// ATR fallback; if that is also over the cap, accept the pivot stop
/// anyway and return `risk_warning = true`. Plan generation never blocks
/// on a risk-bound violation.
pub fn resolve_stop_with_fallback(
    current_price: f64,
    pivot: Option<SwingPivot>,
    atr: f64,
    horizon: Horizon,
) -> (StopLoss, bool) {
    let params = horizon.params();
    let max_risk = params.max_risk_percent();

    let make = |price: f64, method: StopLossMethod| StopLoss {
        price,
        method,
        risk_percent: StopLoss::risk_percent_at(current_price, price),
        horizon,
    };

    let pivot_stop =
        pivot.map(|p| make(p.price * (1.0 - params.stop_buffer), StopLossMethod::SwingLowPivot));

    if let Some(stop) = pivot_stop {
        if stop.risk_percent <= max_risk {
            return (stop, false);
        }
        let fallback = make(
            current_price - atr * params.atr_fallback_mult,
            StopLossMethod::AtrFallback,
        );
        if fallback.risk_percent <= max_risk {
            return (fallback, false);
        }
        // Both over the cap: keep the structure-based stop, flag the plan.
        return (stop, true);
    }

    let fallback = make(
        current_price - atr * params.atr_fallback_mult,
        StopLossMethod::AtrFallback,
    );
    let warning = fallback.risk_percent > max_risk;
    (fallback, warning)
}

/// Independently resolved stops for all three horizons of one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizonStops {
    pub swing: StopLoss,
    pub positional: StopLoss,
    pub longterm: StopLoss,
}

impl HorizonStops {
    pub fn get(&self, horizon: Horizon) -> &StopLoss {
        match horizon {
            Horizon::Swing => &self.swing,
            Horizon::Positional => &self.positional,
            Horizon::LongTerm => &self.longterm,
        }
    }

    /// True when `swing.price >= positional.price >= longterm.price`.
    pub fn is_ordered(&self) -> bool {
        self.swing.price >= self.positional.price && self.positional.price >= self.longterm.price
    }
}

/// Enforce the cross-horizon ordering with a two-pass fix-up.
///
/// Shorter horizons must not carry looser (lower) stops than longer ones.
/// Pass 1 raises swing to positional; pass 2 raises positional to
/// longterm, then re-checks swing against the raised positional. Raised
/// stops switch method to `HierarchyEnforced` and recompute risk.
pub fn enforce_hierarchy(mut stops: HorizonStops, current_price: f64) -> HorizonStops {
    let raise = |stop: &mut StopLoss, floor: f64| {
        if stop.price < floor {
            stop.price = floor;
            stop.method = StopLossMethod::HierarchyEnforced;
            stop.risk_percent = StopLoss::risk_percent_at(current_price, floor);
        }
    };

    raise(&mut stops.swing, stops.positional.price);

    raise(&mut stops.positional, stops.longterm.price);
    // Positional may have been raised above swing; re-check once.
    raise(&mut stops.swing, stops.positional.price);

    debug_assert!(stops.is_ordered());
    stops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    fn pivot(price: f64) -> Option<SwingPivot> {
        Some(SwingPivot { price, index: 10 })
    }

    #[test]
    fn pivot_stop_with_buffer() {
        // Swing: 96 * (1 - 0.005) = 95.52, distance 4.48 in [2, 8] → untouched.
        let stop = resolve_stop(100.0, pivot(96.0), 1.0, Horizon::Swing);
        assert_approx(stop.price, 95.52, 1e-9);
        assert_eq!(stop.method, StopLossMethod::SwingLowPivot);
        assert_approx(stop.risk_percent, 4.48, 1e-9);
    }

    #[test]
    fn minimum_distance_raises_stop() {
        // Pivot right under price: 99.5 * 0.995 = 99.0025, distance ~1.0 < 2%.
        let stop = resolve_stop(100.0, pivot(99.5), 1.0, Horizon::Swing);
        assert_eq!(stop.method, StopLossMethod::MinimumDistanceEnforced);
        assert_approx(stop.price, 98.0, 1e-9);
        assert_approx(stop.risk_percent, 2.0, 1e-9);
    }

    #[test]
    fn maximum_risk_clamps_stop() {
        // Pivot 90 → 90*0.995 = 89.55, risk 10.45% > 8%
        // → stop = 100 - 8 = 92.
        let stop = resolve_stop(100.0, pivot(90.0), 1.0, Horizon::Swing);
        assert_eq!(stop.method, StopLossMethod::MaximumRiskEnforced);
        assert_approx(stop.price, 92.0, 1e-9);
        assert_approx(stop.risk_percent, 8.0, 1e-9);
    }

    #[test]
    fn atr_fallback_without_pivot() {
        // 100 - 2.0 * 2.0 = 96, distance 4% within positional [5%, 15%]?
        // No: 4 < 5 → minimum distance raise to 95.
        let stop = resolve_stop(100.0, None, 2.0, Horizon::Positional);
        assert_eq!(stop.method, StopLossMethod::MinimumDistanceEnforced);
        assert_approx(stop.price, 95.0, 1e-9);

        // Larger ATR lands inside the band: 100 - 3.5*2 = 93, distance 7%.
        let stop = resolve_stop(100.0, None, 3.5, Horizon::Positional);
        assert_eq!(stop.method, StopLossMethod::AtrFallback);
        assert_approx(stop.price, 93.0, 1e-9);
    }

    #[test]
    fn zero_atr_fallback_still_respects_minimum() {
        let stop = resolve_stop(100.0, None, 0.0, Horizon::Swing);
        assert_eq!(stop.method, StopLossMethod::MinimumDistanceEnforced);
        assert_approx(stop.price, 98.0, 1e-9);
    }

    #[test]
    fn fallback_policy_prefers_pivot_inside_cap() {
        let (stop, warn) = resolve_stop_with_fallback(100.0, pivot(96.0), 1.0, Horizon::Swing);
        assert_eq!(stop.method, StopLossMethod::SwingLowPivot);
        assert!(!warn);
    }

    #[test]
    fn fallback_policy_switches_to_atr_when_pivot_too_deep() {
        // Pivot risk 10.45% > 8%; ATR stop = 100 - 1.5*2 = 97, risk 3% → OK.
        let (stop, warn) = resolve_stop_with_fallback(100.0, pivot(90.0), 2.0, Horizon::Swing);
        assert_eq!(stop.method, StopLossMethod::AtrFallback);
        assert_approx(stop.price, 97.0, 1e-9);
        assert!(!warn);
    }

    #[test]
    fn fallback_policy_accepts_deep_pivot_with_warning() {
        // Pivot risk 10.45% and ATR stop = 100 - 1.5*7 = 89.5, risk 10.5%:
        // both over the 8% cap → keep the pivot stop, warn.
        let (stop, warn) = resolve_stop_with_fallback(100.0, pivot(90.0), 7.0, Horizon::Swing);
        assert_eq!(stop.method, StopLossMethod::SwingLowPivot);
        assert_approx(stop.price, 89.55, 1e-9);
        assert!(warn);
    }

    #[test]
    fn hierarchy_already_ordered_is_untouched() {
        let stops = HorizonStops {
            swing: resolve_stop(100.0, pivot(96.0), 1.0, Horizon::Swing),
            positional: resolve_stop(100.0, pivot(92.0), 1.0, Horizon::Positional),
            longterm: resolve_stop(100.0, pivot(85.0), 1.0, Horizon::LongTerm),
        };
        let before = stops.clone();
        let after = enforce_hierarchy(stops, 100.0);
        assert_eq!(after, before);
        assert!(after.is_ordered());
    }

    #[test]
    fn hierarchy_raises_swing_to_positional() {
        let mut stops = HorizonStops {
            swing: resolve_stop(100.0, pivot(96.0), 1.0, Horizon::Swing),
            positional: resolve_stop(100.0, pivot(92.0), 1.0, Horizon::Positional),
            longterm: resolve_stop(100.0, pivot(85.0), 1.0, Horizon::LongTerm),
        };
        // Force a violation: swing below positional.
        stops.swing.price = 90.0;
        let after = enforce_hierarchy(stops.clone(), 100.0);
        assert_eq!(after.swing.price, after.positional.price);
        assert_eq!(after.swing.method, StopLossMethod::HierarchyEnforced);
        assert_approx(
            after.swing.risk_percent,
            StopLoss::risk_percent_at(100.0, after.swing.price),
            1e-9,
        );
        assert!(after.is_ordered());
    }

    #[test]
    fn hierarchy_second_pass_recheck() {
        // Positional below longterm AND swing below the raised positional:
        // the re-check after pass 2 must catch swing again.
        let mut stops = HorizonStops {
            swing: resolve_stop(100.0, pivot(96.0), 1.0, Horizon::Swing),
            positional: resolve_stop(100.0, pivot(92.0), 1.0, Horizon::Positional),
            longterm: resolve_stop(100.0, pivot(85.0), 1.0, Horizon::LongTerm),
        };
        stops.longterm.price = 93.0;
        stops.positional.price = 88.0;
        stops.swing.price = 91.0;
        let after = enforce_hierarchy(stops, 100.0);
        assert_eq!(after.positional.price, 93.0);
        assert_eq!(after.swing.price, 93.0);
        assert!(after.is_ordered());
    }
}
