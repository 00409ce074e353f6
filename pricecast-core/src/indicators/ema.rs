//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (span + 1).
//! Seed: EMA[0] = close[0]. Defined from the first observation, no warm-up gap.
//! Lookback: 0.

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        debug_assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span: span.max(1),
            name: format!("ema_{span}"),
        }
    }

    pub fn alpha(&self) -> f64 {
        2.0 / (self.span as f64 + 1.0)
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        ema_of_series(closes, self.alpha())
    }
}

/// EMA of an arbitrary series with the given smoothing factor, seeded by the
/// first value.
pub fn ema_of_series(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut result = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &v in values {
        let next = match prev {
            None => v,
            Some(p) => alpha * v + (1.0 - alpha) * p,
        };
        result.push(next);
        prev = Some(next);
    }
    result
}
