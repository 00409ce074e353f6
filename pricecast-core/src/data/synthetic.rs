//! Synthetic price generation for offline runs and tests.
//!
//! Produces a random walk seeded from the symbol name, so the same symbol and
//! range always yield the same prices. Results are tagged
//! [`DataSource::Synthetic`] and must never be mistaken for market data.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{DataError, DataSource, PriceSource};
use crate::domain::PricePoint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticPriceSource {
    pub initial_price: f64,
    /// Mean daily return.
    pub drift: f64,
    /// Daily returns are drawn uniformly from `drift ± max_daily_move`.
    /// Negative values count by magnitude; a non-finite value means no noise.
    pub max_daily_move: f64,
}

impl Default for SyntheticPriceSource {
    fn default() -> Self {
        Self {
            initial_price: 100.0,
            drift: 0.0005,
            max_daily_move: 0.03,
        }
    }
}

impl SyntheticPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Weekday prices from `start` through `end`.
    pub fn generate(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<PricePoint> {
        let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let spread = if self.max_daily_move.is_finite() {
            self.max_daily_move.abs()
        } else {
            0.0
        };

        let mut prices = Vec::new();
        let mut close = self.initial_price;
        let mut date = start;
        while date <= end {
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                let ret = self.drift + rng.gen_range(-spread..=spread);
                close *= 1.0 + ret;
                let volume = rng.gen_range(500_000.0..5_000_000.0_f64).round();
                prices.push(PricePoint::new(date, close, volume));
            }
            date += Duration::days(1);
        }
        prices
    }
}

impl PriceSource for SyntheticPriceSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn kind(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, DataError> {
        let prices = self.generate(symbol, start, end);
        if prices.is_empty() {
            return Err(DataError::EmptyRange {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }
        Ok(prices)
    }
}
