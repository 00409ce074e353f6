//! Indicator Engine.
//!
//! Indicators are pure functions: a close series in, a numeric series of the
//! same length out. Warm-up positions hold `f64::NAN`; `IndicatorSeries`
//! turns them into `None` at the boundary.
//!
//! # Look-ahead guard
//! No indicator value at index t may depend on closes after t.

pub mod ema;
pub mod normalized;
pub mod series;
pub mod sma;
pub mod volatility;

pub use ema::Ema;
pub use normalized::Normalized;
pub use series::{compute_indicators, compute_indicators_with, IndicatorParams, IndicatorSeries};
pub use sma::Sma;
pub use volatility::Volatility;

/// A rolling indicator over closes.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "volatility_20").
    fn name(&self) -> &str;

    /// Number of leading positions that stay undefined.
    fn lookback(&self) -> usize;

    /// Compute over the whole series. Output length equals input length,
    /// with the first `lookback()` values set to `f64::NAN`.
    fn compute(&self, closes: &[f64]) -> Vec<f64>;
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
