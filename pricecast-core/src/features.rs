//! Regressor Assembler.
//!
//! Joins price history, volume and the run's sentiment score into the
//! regression frame, and extends that frame into the forecast horizon.
//!
//! Horizon rows carry the last observed volume and the same sentiment
//! (flat-forward fill). No attempt is made to forecast the regressors
//! themselves.

use chrono::{Duration, NaiveDate};

use crate::domain::{FeatureRow, PricePoint};
use crate::error::CoreError;
use crate::sentiment::NEUTRAL_SENTIMENT;

/// Historical feature rows plus what is needed to extend them.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    history: Vec<FeatureRow>,
    sentiment: f64,
    last_date: NaiveDate,
    last_volume: f64,
}

/// Build one feature row per price point, all sharing `sentiment`.
///
/// A non-finite sentiment is replaced by the neutral score.
pub fn assemble(prices: &[PricePoint], sentiment: f64) -> Result<FeatureTable, CoreError> {
    let last = prices
        .last()
        .ok_or(CoreError::InsufficientData { needed: 1, got: 0 })?;

    let sentiment = if sentiment.is_finite() {
        sentiment
    } else {
        tracing::warn!(sentiment, "non-finite sentiment replaced with neutral score");
        NEUTRAL_SENTIMENT
    };

    let history = prices
        .iter()
        .map(|p| FeatureRow {
            date: p.date,
            price: Some(p.close),
            volume: Some(p.volume),
            sentiment: Some(sentiment),
        })
        .collect();

    Ok(FeatureTable {
        history,
        sentiment,
        last_date: last.date,
        last_volume: last.volume,
    })
}

impl FeatureTable {
    pub fn history(&self) -> &[FeatureRow] {
        &self.history
    }

    pub fn sentiment(&self) -> f64 {
        self.sentiment
    }

    pub fn last_date(&self) -> NaiveDate {
        self.last_date
    }

    /// `n_days` rows on consecutive calendar days after the last historical date.
    pub fn extend_horizon(&self, n_days: usize) -> Result<Vec<FeatureRow>, CoreError> {
        if n_days == 0 {
            return Err(CoreError::invalid("horizon must be >= 1 day"));
        }
        Ok((1..=n_days)
            .map(|offset| FeatureRow {
                date: self.last_date + Duration::days(offset as i64),
                price: None,
                volume: Some(self.last_volume),
                sentiment: Some(self.sentiment),
            })
            .collect())
    }

    /// History followed by `n_days` of horizon, the frame used for a single
    /// fitted-plus-forecast prediction pass.
    pub fn future_frame(&self, n_days: usize) -> Result<Vec<FeatureRow>, CoreError> {
        let mut rows = self.history.clone();
        rows.extend(self.extend_horizon(n_days)?);
        Ok(rows)
    }
}
