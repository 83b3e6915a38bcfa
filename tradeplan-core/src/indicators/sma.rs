//! Simple Moving Average (SMA).
//!
//! SMA[t] = mean of the trailing `period` values ending at t.
//! Indices before `period - 1` emit 0.0 (warmup), matching the consumer
//! contract rather than NaN-filling.

/// Compute the SMA series of `values`.
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![0.0; n];
    if period == 0 || n < period {
        return result;
    }

    let mut window_sum: f64 = values[..period].iter().sum();
    result[period - 1] = window_sum / period as f64;

    for i in period..n {
        window_sum += values[i] - values[i - period];
        result[i] = window_sum / period as f64;
    }

    result
}

/// SMA of the trailing `period` values only (the most recent point).
/// Returns 0.0 when there is not enough data, same as the series warmup.
pub fn sma_last(values: &[f64], period: usize) -> f64 {
    if period == 0 || values.len() < period {
        return 0.0;
    }
    values[values.len() - period..].iter().sum::<f64>() / period as f64
}
