//! Feature rows consumed by the forecast model, and its outputs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observation of the regression frame.
///
/// Historical rows carry a `price`; horizon rows leave it `None`.
/// `sentiment` is the same value on every row of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub date: NaiveDate,
    pub price: Option<f64>,
    pub volume: Option<f64>,
    pub sentiment: Option<f64>,
}

/// Point forecast for a single date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_price: f64,
}

/// Additive breakdown of a prediction, in price units.
///
/// `yhat == trend + weekly + yearly + regressors`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastComponents {
    pub date: NaiveDate,
    pub trend: f64,
    pub weekly: f64,
    pub yearly: f64,
    pub regressors: f64,
    pub yhat: f64,
}

impl ForecastComponents {
    pub fn seasonal(&self) -> f64 {
        self.weekly + self.yearly
    }

    pub fn to_point(&self) -> ForecastPoint {
        ForecastPoint {
            date: self.date,
            predicted_price: self.yhat,
        }
    }
}
