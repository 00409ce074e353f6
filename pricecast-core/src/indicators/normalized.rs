//! Normalized price: close relative to the first close in the series.
//!
//! Used to compare symbols on a common scale. Undefined everywhere when the
//! first close is zero.

use super::Indicator;

#[derive(Debug, Clone, Default)]
pub struct Normalized;

impl Indicator for Normalized {
    fn name(&self) -> &str {
        "normalized"
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        match closes.first() {
            Some(&base) if base != 0.0 => closes.iter().map(|c| c / base).collect(),
            _ => vec![f64::NAN; closes.len()],
        }
    }
}
