//! Moving Average Convergence Divergence (MACD).
//!
//! MACD line = EMA12 - EMA26, signal = EMA9 of the MACD line,
//! histogram = MACD - signal.

use super::ema::ema;

/// The three MACD series, index-aligned with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdSeries {
    /// Latest histogram value, 0.0 for an empty series.
    pub fn last_histogram(&self) -> f64 {
        self.histogram.last().copied().unwrap_or(0.0)
    }
}

/// Compute MACD with the standard 12/26/9 parameters.
pub fn macd(closes: &[f64]) -> MacdSeries {
    let fast = ema(closes, 12);
    let slow = ema(closes, 26);

    let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = ema(&line, 9);
    let histogram: Vec<f64> = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

    MacdSeries {
        line,
        signal,
        histogram,
    }
}
