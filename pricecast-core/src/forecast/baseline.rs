//! Straight-line price trend fitted by ordinary least squares on calendar days.
//!
//! Used as a sanity check next to the additive model: if the two disagree
//! wildly at the end of the horizon, the seasonal or regressor terms are
//! doing most of the work.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::MODEL_MIN_HISTORY;
use crate::domain::{FeatureRow, ForecastPoint};
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTrendBaseline {
    pub origin: NaiveDate,
    pub intercept: f64,
    pub slope_per_day: f64,
}

impl LinearTrendBaseline {
    /// Regress price on days since the first priced row.
    pub fn fit(history: &[FeatureRow]) -> Result<Self, CoreError> {
        let points: Vec<(NaiveDate, f64)> = history
            .iter()
            .filter_map(|r| r.price.filter(|p| p.is_finite()).map(|p| (r.date, p)))
            .collect();
        if points.len() < MODEL_MIN_HISTORY {
            return Err(CoreError::InsufficientData {
                needed: MODEL_MIN_HISTORY,
                got: points.len(),
            });
        }

        let origin = points.iter().map(|(d, _)| *d).min().unwrap_or(points[0].0);
        let n = points.len() as f64;
        let xs: Vec<f64> = points
            .iter()
            .map(|(d, _)| (*d - origin).num_days() as f64)
            .collect();
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, p)| p).sum::<f64>() / n;

        let mut sxy = 0.0;
        let mut sxx = 0.0;
        for (x, (_, y)) in xs.iter().zip(&points) {
            sxy += (x - mean_x) * (y - mean_y);
            sxx += (x - mean_x) * (x - mean_x);
        }
        // All rows on one date: no slope information.
        let slope_per_day = if sxx > 0.0 { sxy / sxx } else { 0.0 };

        Ok(Self {
            origin,
            intercept: mean_y - slope_per_day * mean_x,
            slope_per_day,
        })
    }

    pub fn value_at(&self, date: NaiveDate) -> f64 {
        self.intercept + self.slope_per_day * (date - self.origin).num_days() as f64
    }

    pub fn predict(&self, dates: &[NaiveDate]) -> Vec<ForecastPoint> {
        dates
            .iter()
            .map(|&date| ForecastPoint {
                date,
                predicted_price: self.value_at(date),
            })
            .collect()
    }
}
