//! Bollinger Bands.
//!
//! Middle = SMA(period), upper/lower = middle ± k × population standard
//! deviation of the trailing window. Warmup indices emit 0.0 in all three
//! series, same convention as `sma`.

use super::sma::sma;

/// Upper/middle/lower band series, index-aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Compute Bollinger Bands (20, 2.0 standard).
pub fn bollinger(closes: &[f64], period: usize, std_dev_mult: f64) -> BollingerBands {
    let n = closes.len();
    let middle = sma(closes, period);
    let mut upper = vec![0.0; n];
    let mut lower = vec![0.0; n];

    if period > 0 && n >= period {
        for i in (period - 1)..n {
            let window = &closes[i + 1 - period..=i];
            let mean = middle[i];
            let variance =
                window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / period as f64;
            let band = std_dev_mult * variance.sqrt();
            upper[i] = mean + band;
            lower[i] = mean - band;
        }
    }

    BollingerBands {
        upper,
        middle,
        lower,
    }
}
