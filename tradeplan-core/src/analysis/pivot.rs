//! Swing-low pivot detection.
//!
//! A pivot is a bar whose `low` is strictly below every `low` in the
//! `left` bars before it and the `right` bars after it. Among all
//! qualifying pivots the LOWEST price wins (not the most recent); ties go
//! to the first occurrence.

use crate::domain::{PriceBar, SwingPivot};

/// Scan `bars` for the deepest qualifying swing low.
///
/// Returns `None` when the history is shorter than `left + right + 1`
/// bars or no bar qualifies (monotone or flat series).
pub fn find_swing_low(bars: &[PriceBar], left: usize, right: usize) -> Option<SwingPivot> {
    let n = bars.len();
    if left == 0 || right == 0 || n < left + right + 1 {
        return None;
    }

    let mut best: Option<SwingPivot> = None;

    for i in left..(n - right) {
        let low = bars[i].low;

        let left_ok = bars[i - left..i].iter().all(|b| low < b.low);
        if !left_ok {
            continue;
        }
        let right_ok = bars[i + 1..=i + right].iter().all(|b| low < b.low);
        if !right_ok {
            continue;
        }

        // Strict < keeps the first occurrence on equal prices.
        match best {
            Some(b) if low >= b.price => {}
            _ => best = Some(SwingPivot { price: low, index: i }),
        }
    }

    best
}
