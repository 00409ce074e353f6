//! Feature matrix layout for the additive model.
//!
//! Column order is fixed at fit time:
//! `[intercept, t, (t - s₁)₊ … (t - s_k)₊, yearly sin/cos …, weekly sin/cos …, regressors …]`.

use std::f64::consts::PI;
use std::ops::Range;

use chrono::{Datelike, NaiveDate};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::domain::FeatureRow;
use crate::error::CoreError;

/// Extra regressor columns the model can consume from a [`FeatureRow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regressor {
    Volume,
    Sentiment,
}

impl Regressor {
    pub fn name(&self) -> &'static str {
        match self {
            Regressor::Volume => "volume",
            Regressor::Sentiment => "sentiment",
        }
    }

    pub fn value(&self, row: &FeatureRow) -> Option<f64> {
        match self {
            Regressor::Volume => row.volume,
            Regressor::Sentiment => row.sentiment,
        }
    }

    /// The row's value, or `MissingRegressor` when absent or non-finite.
    pub(crate) fn require(&self, row: &FeatureRow) -> Result<f64, CoreError> {
        match self.value(row) {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(CoreError::MissingRegressor {
                regressor: self.name().to_string(),
                date: row.date,
            }),
        }
    }
}

/// Fourier series of `order` harmonics over `period` days.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Fourier {
    pub period: f64,
    pub order: usize,
}

impl Fourier {
    pub const YEARLY: Fourier = Fourier {
        period: 365.25,
        order: 10,
    };
    pub const WEEKLY: Fourier = Fourier {
        period: 7.0,
        order: 3,
    };

    fn width(&self) -> usize {
        2 * self.order
    }

    fn push_terms(&self, day: f64, out: &mut Vec<f64>) {
        for k in 1..=self.order {
            let angle = 2.0 * PI * k as f64 * day / self.period;
            out.push(angle.sin());
            out.push(angle.cos());
        }
    }
}

/// Standardization applied to one regressor column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RegressorScale {
    pub regressor: Regressor,
    pub mean: f64,
    pub std: f64,
}

impl RegressorScale {
    /// Mean and sample std of the history. A constant column is only rescaled
    /// by its magnitude, so it acts as a second intercept.
    pub fn from_values(regressor: Regressor, values: &[f64]) -> Self {
        let n = values.len();
        if n > 1 {
            let mean = values.iter().sum::<f64>() / n as f64;
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            let std = var.sqrt();
            if std > 0.0 && std.is_finite() {
                return Self {
                    regressor,
                    mean,
                    std,
                };
            }
        }
        let magnitude = values.first().map_or(0.0, |v| v.abs());
        Self {
            regressor,
            mean: 0.0,
            std: if magnitude > 0.0 { magnitude } else { 1.0 },
        }
    }

    fn apply(&self, value: f64) -> f64 {
        (value - self.mean) / self.std
    }
}

/// Column layout and input scaling, fixed when the model is fitted.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DesignLayout {
    pub origin: NaiveDate,
    pub span_days: f64,
    pub changepoints: Vec<f64>,
    pub yearly: Option<Fourier>,
    pub weekly: Option<Fourier>,
    pub regressors: Vec<RegressorScale>,
}

impl DesignLayout {
    pub fn trend_range(&self) -> Range<usize> {
        0..2 + self.changepoints.len()
    }

    pub fn yearly_range(&self) -> Range<usize> {
        let start = self.trend_range().end;
        start..start + self.yearly.map_or(0, |f| f.width())
    }

    pub fn weekly_range(&self) -> Range<usize> {
        let start = self.yearly_range().end;
        start..start + self.weekly.map_or(0, |f| f.width())
    }

    pub fn regressor_range(&self) -> Range<usize> {
        let start = self.weekly_range().end;
        start..start + self.regressors.len()
    }

    pub fn width(&self) -> usize {
        self.regressor_range().end
    }

    /// Days since the first history date, scaled so the history spans [0, 1].
    pub fn scaled_time(&self, date: NaiveDate) -> f64 {
        (date - self.origin).num_days() as f64 / self.span_days
    }

    pub fn row(&self, row: &FeatureRow) -> Result<Vec<f64>, CoreError> {
        let t = self.scaled_time(row.date);
        let mut out = Vec::with_capacity(self.width());

        out.push(1.0);
        out.push(t);
        out.extend(self.changepoints.iter().map(|s| (t - s).max(0.0)));

        // Seasonal phase is anchored to the calendar, not to the history start.
        let day = row.date.num_days_from_ce() as f64;
        if let Some(f) = self.yearly {
            f.push_terms(day, &mut out);
        }
        if let Some(f) = self.weekly {
            f.push_terms(day, &mut out);
        }

        for scale in &self.regressors {
            out.push(scale.apply(scale.regressor.require(row)?));
        }
        Ok(out)
    }

    pub fn matrix(&self, rows: &[FeatureRow]) -> Result<Array2<f64>, CoreError> {
        let width = self.width();
        let mut data = Vec::with_capacity(rows.len() * width);
        for row in rows {
            data.extend(self.row(row)?);
        }
        Array2::from_shape_vec((rows.len(), width), data)
            .map_err(|e| CoreError::Numerical(e.to_string()))
    }
}

/// Row indexes of potential changepoints: evenly spaced over the first
/// `range` fraction of `n_rows`, excluding the first row.
pub(crate) fn changepoint_indices(n_rows: usize, requested: usize, range: f64) -> Vec<usize> {
    let hist_size = (n_rows as f64 * range).floor() as usize;
    let n = requested.min(hist_size.saturating_sub(1));
    if n == 0 {
        return Vec::new();
    }
    let last = (hist_size - 1) as f64;
    (1..=n)
        .map(|i| (last * i as f64 / n as f64).round() as usize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn feature(d: NaiveDate, volume: Option<f64>) -> FeatureRow {
        FeatureRow {
            date: d,
            price: Some(1.0),
            volume,
            sentiment: Some(0.1),
        }
    }

    #[test]
    fn changepoints_spread_over_first_eighty_percent() {
        let idx = changepoint_indices(100, 25, 0.8);
        assert_eq!(idx.len(), 25);
        assert_eq!(idx[0], 3);
        assert_eq!(*idx.last().unwrap(), 79);
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn changepoints_shrink_with_short_history() {
        assert!(changepoint_indices(2, 25, 0.8).is_empty());
        assert_eq!(changepoint_indices(10, 25, 0.8), vec![1, 2, 3, 4, 5, 6, 7]);
        assert!(changepoint_indices(100, 0, 0.8).is_empty());
    }

    #[test]
    fn regressor_scale_standardizes() {
        let scale = RegressorScale::from_values(Regressor::Volume, &[1.0, 2.0, 3.0]);
        assert_eq!(scale.mean, 2.0);
        assert_eq!(scale.std, 1.0);
        assert_eq!(scale.apply(4.0), 2.0);
    }

    #[test]
    fn constant_regressor_scaled_by_magnitude() {
        let scale = RegressorScale::from_values(Regressor::Sentiment, &[-0.5, -0.5]);
        assert_eq!(scale.mean, 0.0);
        assert_eq!(scale.std, 0.5);

        let zero = RegressorScale::from_values(Regressor::Sentiment, &[0.0, 0.0]);
        assert_eq!(zero.std, 1.0);
        assert_eq!(zero.apply(0.0), 0.0);
    }

    #[test]
    fn row_layout_matches_ranges() {
        let layout = DesignLayout {
            origin: date(2024, 1, 1),
            span_days: 10.0,
            changepoints: vec![0.5],
            yearly: None,
            weekly: Some(Fourier::WEEKLY),
            regressors: vec![RegressorScale::from_values(Regressor::Volume, &[1.0, 3.0])],
        };
        assert_eq!(layout.trend_range(), 0..3);
        assert_eq!(layout.yearly_range(), 3..3);
        assert_eq!(layout.weekly_range(), 3..9);
        assert_eq!(layout.regressor_range(), 9..10);

        let row = layout.row(&feature(date(2024, 1, 9), Some(3.0))).unwrap();
        assert_eq!(row.len(), layout.width());
        assert_eq!(row[0], 1.0);
        assert!((row[1] - 0.8).abs() < 1e-12);
        assert!((row[2] - 0.3).abs() < 1e-12);
        assert!((row[9] - 2.0_f64.sqrt() / 2.0).abs() < 1e-12);
    }

    #[test]
    fn missing_regressor_names_column_and_date() {
        let layout = DesignLayout {
            origin: date(2024, 1, 1),
            span_days: 1.0,
            changepoints: vec![],
            yearly: None,
            weekly: None,
            regressors: vec![RegressorScale::from_values(Regressor::Volume, &[1.0])],
        };
        let err = layout.row(&feature(date(2024, 1, 5), None)).unwrap_err();
        assert_eq!(
            err,
            CoreError::MissingRegressor {
                regressor: "volume".into(),
                date: date(2024, 1, 5),
            }
        );

        let err = layout
            .row(&feature(date(2024, 1, 5), Some(f64::NAN)))
            .unwrap_err();
        assert!(matches!(err, CoreError::MissingRegressor { .. }));
    }
}
