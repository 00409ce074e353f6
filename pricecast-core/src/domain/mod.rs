//! Domain types for PriceCast

pub mod feature;
pub mod price;

pub use feature::{FeatureRow, ForecastComponents, ForecastPoint};
pub use price::{closes, validate_history, HistoryError, PricePoint};
