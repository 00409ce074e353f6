//! In-memory price source for tests and embedding.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::provider::{clip_to_range, DataError, DataSource, PriceSource};
use crate::domain::PricePoint;

#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
    prices: HashMap<String, Vec<PricePoint>>,
}

impl StaticPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbol(mut self, symbol: &str, prices: Vec<PricePoint>) -> Self {
        self.prices.insert(symbol.to_string(), prices);
        self
    }

    pub fn insert(&mut self, symbol: &str, prices: Vec<PricePoint>) {
        self.prices.insert(symbol.to_string(), prices);
    }
}

impl PriceSource for StaticPriceSource {
    fn name(&self) -> &str {
        "static"
    }

    fn kind(&self) -> DataSource {
        DataSource::InMemory
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, DataError> {
        let prices = self
            .prices
            .get(symbol)
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?;
        clip_to_range(symbol, prices.clone(), start, end)
    }
}
