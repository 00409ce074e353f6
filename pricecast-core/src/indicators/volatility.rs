//! Rolling volatility: sample standard deviation of closes.
//!
//! Uses the n-1 denominator, so a window of 1 never produces a value.
//! Lookback: window - 1.

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Volatility {
    window: usize,
    name: String,
}

impl Volatility {
    pub fn new(window: usize) -> Self {
        debug_assert!(window >= 1, "volatility window must be >= 1");
        Self {
            window: window.max(1),
            name: format!("volatility_{window}"),
        }
    }
}

impl Indicator for Volatility {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window.saturating_sub(1)
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let n = closes.len();
        let mut result = vec![f64::NAN; n];

        if self.window < 2 || n < self.window {
            return result;
        }

        let denom = (self.window - 1) as f64;
        for i in (self.window - 1)..n {
            let window = &closes[i + 1 - self.window..=i];
            // Two-pass keeps constant windows at (near) zero instead of
            // accumulating cancellation error from running sums.
            let mean = window.iter().sum::<f64>() / self.window as f64;
            let ss: f64 = window.iter().map(|c| (c - mean).powi(2)).sum();
            result[i] = (ss / denom).sqrt();
        }

        result
    }
}
