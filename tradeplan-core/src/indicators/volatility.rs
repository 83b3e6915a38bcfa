//! Close-to-close volatility proxy ("ATR").
//!
//! Mean of |close[i] - close[i-1]| over the trailing `period` changes.
//! This is deliberately NOT Wilder true range: every risk constant in the
//! stop and sizing tables was tuned against this proxy, so correcting it
//! would silently move every fallback stop.

/// Trailing close-to-close volatility. 0.0 when fewer than 2 closes.
pub fn atr_proxy(closes: &[f64], period: usize) -> f64 {
    let n = closes.len();
    if n < 2 || period == 0 {
        return 0.0;
    }

    let window = period.min(n - 1);
    let start = n - 1 - window;
    let mut sum = 0.0;
    for i in (start + 1)..n {
        sum += (closes[i] - closes[i - 1]).abs();
    }
    sum / window as f64
}
