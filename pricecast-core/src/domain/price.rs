//! PricePoint: one daily close/volume observation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Daily close and volume for a single symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64, volume: f64) -> Self {
        Self {
            date,
            close,
            volume,
        }
    }
}

/// Ways a price history can violate the ordering contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HistoryError {
    #[error("dates not strictly increasing at index {index}: {previous} then {current}")]
    OutOfOrder {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("non-finite close on {date}")]
    NonFiniteClose { date: NaiveDate },
}

/// Check that dates are strictly increasing (so also deduplicated) and
/// closes are finite.
pub fn validate_history(prices: &[PricePoint]) -> Result<(), HistoryError> {
    for (i, p) in prices.iter().enumerate() {
        if !p.close.is_finite() {
            return Err(HistoryError::NonFiniteClose { date: p.date });
        }
        if i > 0 && p.date <= prices[i - 1].date {
            return Err(HistoryError::OutOfOrder {
                index: i,
                previous: prices[i - 1].date,
                current: p.date,
            });
        }
    }
    Ok(())
}

/// Extract the close column.
pub fn closes(prices: &[PricePoint]) -> Vec<f64> {
    prices.iter().map(|p| p.close).collect()
}
