//! Simple Moving Average (SMA).
//!
//! Rolling mean of closes over a trailing window.
//! Lookback: window - 1 (first defined value at index window-1).

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Sma {
    window: usize,
    name: String,
}

impl Sma {
    /// `window` must be >= 1; callers validate before construction.
    pub fn new(window: usize) -> Self {
        debug_assert!(window >= 1, "SMA window must be >= 1");
        Self {
            window: window.max(1),
            name: format!("sma_{window}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window.saturating_sub(1)
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let n = closes.len();
        let mut result = vec![f64::NAN; n];

        if n < self.window {
            return result;
        }

        let mut sum: f64 = closes[..self.window].iter().sum();
        result[self.window - 1] = sum / self.window as f64;

        // Roll the window forward
        for i in self.window..n {
            sum += closes[i] - closes[i - self.window];
            result[i] = sum / self.window as f64;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn sma_3_on_one_to_five() {
        let result = Sma::new(3).compute(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(result.len(), 5);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 2.0, DEFAULT_EPSILON);
        assert_approx(result[3], 3.0, DEFAULT_EPSILON);
        assert_approx(result[4], 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_1_is_close() {
        let result = Sma::new(1).compute(&[100.0, 200.0, 300.0]);
        assert_approx(result[0], 100.0, DEFAULT_EPSILON);
        assert_approx(result[1], 200.0, DEFAULT_EPSILON);
        assert_approx(result[2], 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_lookback() {
        assert_eq!(Sma::new(20).lookback(), 19);
        assert_eq!(Sma::new(1).lookback(), 0);
    }

    #[test]
    fn sma_too_few_closes() {
        let result = Sma::new(5).compute(&[10.0, 11.0]);
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
