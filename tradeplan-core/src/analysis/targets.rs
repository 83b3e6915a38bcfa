//! Profit targets and the headline risk:reward ratio.
//!
//! # Formula
//! ```text
//! risk_per_share = |current - stop|
//! target[i].price = current + risk_per_share * mult[i]
//! target[i].ratio = mult[i]
//! headline R:R = (target[0].price - current) / risk_per_share, 2 decimals
//! ```
//! Probabilities decrease per tier: 70 / 50 / 30. This triple is the one
//! authoritative set for every call site.

use crate::domain::{Horizon, StopLoss, Target};

/// Win-probability estimates per target tier.
pub const TARGET_PROBABILITIES: [f64; 3] = [70.0, 50.0, 30.0];

/// Floor applied to risk-per-share before it divides anything.
pub const MIN_RISK_PER_SHARE: f64 = 1e-9;

/// Derive the three-target ladder and the headline ratio.
///
/// A stop sitting exactly at the current price (zero risk) yields targets
/// at the current price and a headline ratio of 0 rather than infinity.
pub fn targets_for(current_price: f64, stop: &StopLoss, horizon: Horizon) -> ([Target; 3], f64) {
    let mults = horizon.params().target_mults;
    let risk_per_share = (current_price - stop.price).abs();

    let tier = |i: usize| Target {
        price: current_price + risk_per_share * mults[i],
        probability: TARGET_PROBABILITIES[i],
        risk_reward_ratio: mults[i],
    };
    let targets = [tier(0), tier(1), tier(2)];

    let headline = if risk_per_share > MIN_RISK_PER_SHARE {
        let ratio = (targets[0].price - current_price) / risk_per_share;
        (ratio * 100.0).round() / 100.0
    } else {
        0.0
    };

    (targets, headline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StopLossMethod, SwingPivot};
    use crate::indicators::assert_approx;

    fn stop_at(current: f64, price: f64, horizon: Horizon) -> StopLoss {
        let _ = SwingPivot { price, index: 0 };
        StopLoss {
            price,
            method: StopLossMethod::SwingLowPivot,
            risk_percent: StopLoss::risk_percent_at(current, price),
            horizon,
        }
    }

    #[test]
    fn swing_targets_ladder() {
        // risk = 4, mults [1.5, 2.5, 4] → 106, 110, 116
        let stop = stop_at(100.0, 96.0, Horizon::Swing);
        let (targets, rr) = targets_for(100.0, &stop, Horizon::Swing);
        assert_approx(targets[0].price, 106.0, 1e-9);
        assert_approx(targets[1].price, 110.0, 1e-9);
        assert_approx(targets[2].price, 116.0, 1e-9);
        assert_eq!(targets[0].probability, 70.0);
        assert_eq!(targets[2].probability, 30.0);
        assert_approx(rr, 1.5, 1e-9);
    }

    #[test]
    fn targets_strictly_increase() {
        for h in Horizon::ALL {
            let stop = stop_at(100.0, 93.0, h);
            let (targets, _) = targets_for(100.0, &stop, h);
            assert!(targets[0].price < targets[1].price);
            assert!(targets[1].price < targets[2].price);
            assert!(targets[0].risk_reward_ratio < targets[1].risk_reward_ratio);
            assert!(targets[0].probability >= targets[1].probability);
            assert!(targets[1].probability >= targets[2].probability);
        }
    }

    #[test]
    fn headline_ratio_rounds_to_two_decimals() {
        // risk = 3, target0 = 100 + 3*2 = 106 → ratio exactly 2.0
        let stop = stop_at(100.0, 97.0, Horizon::Positional);
        let (_, rr) = targets_for(100.0, &stop, Horizon::Positional);
        assert_eq!(rr, 2.0);
    }

    #[test]
    fn zero_risk_guard() {
        let stop = stop_at(100.0, 100.0, Horizon::Swing);
        let (targets, rr) = targets_for(100.0, &stop, Horizon::Swing);
        assert_eq!(rr, 0.0);
        assert!(targets.iter().all(|t| t.price == 100.0));
        assert!(targets.iter().all(|t| t.price.is_finite()));
    }
}
