//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = k * value[t] + (1 - k) * EMA[t-1], k = 2/(period+1).
//! Seed: EMA[0] = value[0]. No warmup gap — every index carries a value,
//! which is what the downstream crossover checks expect.

/// Compute the EMA series of `values`.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    if n == 0 || period == 0 {
        return vec![0.0; n];
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut result = Vec::with_capacity(n);
    result.push(values[0]);

    for i in 1..n {
        let prev = result[i - 1];
        result.push(values[i] * k + prev * (1.0 - k));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn ema_period_1_equals_input() {
        let result = ema(&[100.0, 200.0, 300.0], 1);
        assert_eq!(result, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn ema_3_known_values() {
        // k = 2/(3+1) = 0.5, seed = 10
        // EMA[1] = 0.5*11 + 0.5*10 = 10.5
        // EMA[2] = 0.5*12 + 0.5*10.5 = 11.25
        // EMA[3] = 0.5*13 + 0.5*11.25 = 12.125
        let result = ema(&[10.0, 11.0, 12.0, 13.0], 3);
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert_approx(result[1], 10.5, DEFAULT_EPSILON);
        assert_approx(result[2], 11.25, DEFAULT_EPSILON);
        assert_approx(result[3], 12.125, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_empty_input() {
        assert!(ema(&[], 5).is_empty());
    }

    #[test]
    fn ema_converges_to_constant_series() {
        let values = vec![50.0; 100];
        let result = ema(&values, 20);
        assert_approx(result[99], 50.0, DEFAULT_EPSILON);
    }
}
