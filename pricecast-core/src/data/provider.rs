//! Source traits and structured error types.
//!
//! `PriceSource` and `HeadlineSource` abstract over where inputs come from
//! (CSV files, in-memory fixtures, synthetic generation) so the pipeline can
//! be driven by fixtures in tests.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{validate_history, PricePoint};

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("no prices for '{symbol}' between {start} and {end}")]
    EmptyRange {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// Where a price history came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    CsvFile,
    InMemory,
    Synthetic,
}

/// Daily close/volume history for a symbol.
pub trait PriceSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Provenance tag attached to everything this source returns.
    fn kind(&self) -> DataSource;

    /// Prices for `symbol` within `[start, end]`, ascending by date.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, DataError>;
}

/// Recent news headlines for a symbol, most relevant first.
pub trait HeadlineSource: Send + Sync {
    fn name(&self) -> &str;

    fn headlines(&self, symbol: &str) -> Result<Vec<String>, DataError>;
}

/// Sort, restrict to `[start, end]`, and validate a raw history.
///
/// Duplicate dates and non-finite closes are validation errors; an empty
/// result is `EmptyRange`.
pub fn clip_to_range(
    symbol: &str,
    mut prices: Vec<PricePoint>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PricePoint>, DataError> {
    prices.retain(|p| p.date >= start && p.date <= end);
    prices.sort_by_key(|p| p.date);

    if prices.is_empty() {
        return Err(DataError::EmptyRange {
            symbol: symbol.to_string(),
            start,
            end,
        });
    }
    validate_history(&prices).map_err(|e| DataError::ValidationError(format!("{symbol}: {e}")))?;
    Ok(prices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn clip_sorts_and_filters() {
        let prices = vec![
            PricePoint::new(day(5), 3.0, 1.0),
            PricePoint::new(day(1), 1.0, 1.0),
            PricePoint::new(day(3), 2.0, 1.0),
            PricePoint::new(day(9), 4.0, 1.0),
        ];
        let clipped = clip_to_range("X", prices, day(2), day(6)).unwrap();
        let dates: Vec<_> = clipped.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![day(3), day(5)]);
    }

    #[test]
    fn clip_rejects_duplicates() {
        let prices = vec![
            PricePoint::new(day(3), 1.0, 1.0),
            PricePoint::new(day(3), 2.0, 1.0),
        ];
        let err = clip_to_range("X", prices, day(1), day(9)).unwrap_err();
        assert!(matches!(err, DataError::ValidationError(_)));
    }

    #[test]
    fn clip_empty_range_is_reported() {
        let prices = vec![PricePoint::new(day(3), 1.0, 1.0)];
        let err = clip_to_range("X", prices, day(10), day(20)).unwrap_err();
        assert!(err.to_string().contains("no prices for 'X'"));
    }
}
