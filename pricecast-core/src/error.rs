//! Core error type shared by the indicator, assembly and forecast stages.
//!
//! All variants are local, synchronous failures. Nothing in the core retries.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("row {date} is missing regressor '{regressor}'")]
    MissingRegressor { regressor: String, date: NaiveDate },

    #[error("numerical failure: {0}")]
    Numerical(String),
}

impl CoreError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        let err = CoreError::InsufficientData { needed: 2, got: 1 };
        assert_eq!(
            err.to_string(),
            "insufficient data: need at least 2 observations, got 1"
        );

        let err = CoreError::MissingRegressor {
            regressor: "volume".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        };
        assert!(err.to_string().contains("volume"));
        assert!(err.to_string().contains("2024-01-02"));
    }
}
