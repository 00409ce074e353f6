//! Forecast Model.
//!
//! An additive regression forecaster:
//!
//! ```text
//! y(t) = trend(t) + yearly(t) + weekly(t) + Σ βᵢ·xᵢ(t)
//! ```
//!
//! - `trend` is piecewise linear with potential changepoints spread over the
//!   first `changepoint_range` of the history.
//! - `yearly` and `weekly` are Fourier series anchored to the calendar.
//! - `xᵢ` are the standardized regressor columns (volume, sentiment).
//!
//! Coefficients are the MAP estimate under independent Gaussian priors, which
//! reduces to a ridge system solved once per fit. Predictions are point
//! estimates; no uncertainty intervals are produced.

pub mod baseline;
mod design;
mod linalg;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::domain::{FeatureRow, ForecastComponents, ForecastPoint};
use crate::error::CoreError;
use design::{changepoint_indices, DesignLayout, Fourier, RegressorScale};

pub use baseline::LinearTrendBaseline;
pub use design::Regressor;

/// Fewest priced rows any fit accepts, regardless of configuration.
pub const MODEL_MIN_HISTORY: usize = 2;

const YEARLY_AUTO_MIN_DAYS: i64 = 730;
const WEEKLY_AUTO_MIN_DAYS: i64 = 14;
const TREND_PRIOR_SCALE: f64 = 5.0;

/// Whether a seasonal component is fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seasonality {
    /// Decide from the span and spacing of the history.
    #[default]
    Auto,
    Enabled,
    Disabled,
}

impl Seasonality {
    fn resolve(self, auto: bool) -> bool {
        match self {
            Seasonality::Auto => auto,
            Seasonality::Enabled => true,
            Seasonality::Disabled => false,
        }
    }
}

/// Model hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub yearly_seasonality: Seasonality,
    pub weekly_seasonality: Seasonality,
    pub n_changepoints: usize,
    pub changepoint_range: f64,
    pub changepoint_prior_scale: f64,
    pub seasonality_prior_scale: f64,
    pub regressor_prior_scale: f64,
    pub observation_noise: f64,
    pub regressors: Vec<Regressor>,
    /// Minimum priced rows; values below [`MODEL_MIN_HISTORY`] are raised to it.
    pub min_history: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            yearly_seasonality: Seasonality::Auto,
            weekly_seasonality: Seasonality::Auto,
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            regressor_prior_scale: 10.0,
            observation_noise: 0.05,
            regressors: vec![Regressor::Volume, Regressor::Sentiment],
            min_history: MODEL_MIN_HISTORY,
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.changepoint_range > 0.0 && self.changepoint_range <= 1.0) {
            return Err(CoreError::invalid(format!(
                "changepoint_range must be in (0, 1], got {}",
                self.changepoint_range
            )));
        }
        for (name, value) in [
            ("changepoint_prior_scale", self.changepoint_prior_scale),
            ("seasonality_prior_scale", self.seasonality_prior_scale),
            ("regressor_prior_scale", self.regressor_prior_scale),
            ("observation_noise", self.observation_noise),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(CoreError::invalid(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Ridge penalty per column: `σ² / τ²` for the column's prior scale `τ`.
    fn penalty(&self, layout: &DesignLayout) -> Array1<f64> {
        let noise = self.observation_noise * self.observation_noise;
        let lambda = |scale: f64| noise / (scale * scale);

        let mut penalty = Array1::zeros(layout.width());
        for i in layout.trend_range() {
            penalty[i] = if i < 2 {
                lambda(TREND_PRIOR_SCALE)
            } else {
                lambda(self.changepoint_prior_scale)
            };
        }
        for i in layout.yearly_range().start..layout.weekly_range().end {
            penalty[i] = lambda(self.seasonality_prior_scale);
        }
        for i in layout.regressor_range() {
            penalty[i] = lambda(self.regressor_prior_scale);
        }
        penalty
    }
}

/// Goodness-of-fit and structure of a fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitDiagnostics {
    pub rows: usize,
    pub changepoints: usize,
    pub yearly_seasonality: bool,
    pub weekly_seasonality: bool,
    pub regressors: Vec<Regressor>,
    /// In-sample root mean squared error, in price units.
    pub rmse: f64,
    /// In-sample R²; `None` when the history is constant.
    pub r_squared: Option<f64>,
}

/// Unfitted model: hyperparameters only.
#[derive(Debug, Clone, Default)]
pub struct ForecastModel {
    config: ForecastConfig,
}

impl ForecastModel {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Fit on historical rows. Rows without a finite price are dropped first.
    pub fn fit(&self, history: &[FeatureRow]) -> Result<FittedModel, CoreError> {
        self.config.validate()?;

        let mut rows: Vec<FeatureRow> = history
            .iter()
            .filter(|r| r.price.is_some_and(f64::is_finite))
            .copied()
            .collect();
        rows.sort_by_key(|r| r.date);

        let needed = self.config.min_history.max(MODEL_MIN_HISTORY);
        if rows.len() < needed {
            return Err(CoreError::InsufficientData {
                needed,
                got: rows.len(),
            });
        }
        if rows.len() < history.len() {
            tracing::debug!(
                dropped = history.len() - rows.len(),
                "dropped unpriced rows before fit"
            );
        }

        let mut scales = Vec::with_capacity(self.config.regressors.len());
        for &regressor in &self.config.regressors {
            let values = rows
                .iter()
                .map(|r| regressor.require(r))
                .collect::<Result<Vec<_>, _>>()?;
            scales.push(RegressorScale::from_values(regressor, &values));
        }

        let origin = rows[0].date;
        let span = (rows[rows.len() - 1].date - origin).num_days();
        let min_spacing = rows
            .windows(2)
            .map(|w| (w[1].date - w[0].date).num_days())
            .min()
            .unwrap_or(0);

        let yearly = self
            .config
            .yearly_seasonality
            .resolve(span >= YEARLY_AUTO_MIN_DAYS);
        if yearly && span < YEARLY_AUTO_MIN_DAYS {
            tracing::warn!(
                span_days = span,
                "yearly seasonality forced on with less than two years of history"
            );
        }
        let weekly = self
            .config
            .weekly_seasonality
            .resolve(span >= WEEKLY_AUTO_MIN_DAYS && min_spacing < 7);

        let span_days = if span > 0 { span as f64 } else { 1.0 };
        let changepoints = changepoint_indices(
            rows.len(),
            self.config.n_changepoints,
            self.config.changepoint_range,
        )
        .into_iter()
        .map(|i| (rows[i].date - origin).num_days() as f64 / span_days)
        .collect();

        let layout = DesignLayout {
            origin,
            span_days,
            changepoints,
            yearly: yearly.then_some(Fourier::YEARLY),
            weekly: weekly.then_some(Fourier::WEEKLY),
            regressors: scales,
        };

        let actual: Vec<f64> = rows.iter().filter_map(|r| r.price).collect();
        let y_scale = actual.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        let y_scale = if y_scale > 0.0 { y_scale } else { 1.0 };

        let x = layout.matrix(&rows)?;
        let y: Array1<f64> = actual.iter().map(|v| v / y_scale).collect();
        let beta = linalg::solve_ridge(&x, &y, &self.config.penalty(&layout))?;

        let fitted = (x.dot(&beta) * y_scale).to_vec();
        let diagnostics = FitDiagnostics {
            rows: rows.len(),
            changepoints: layout.changepoints.len(),
            yearly_seasonality: yearly,
            weekly_seasonality: weekly,
            regressors: self.config.regressors.clone(),
            rmse: rmse(&actual, &fitted),
            r_squared: r_squared(&actual, &fitted),
        };

        tracing::debug!(
            rows = diagnostics.rows,
            changepoints = diagnostics.changepoints,
            yearly,
            weekly,
            rmse = diagnostics.rmse,
            "forecast model fitted"
        );

        Ok(FittedModel {
            layout,
            beta: beta.to_vec(),
            y_scale,
            diagnostics,
        })
    }
}

/// A model fitted to one symbol's training window.
#[derive(Debug, Clone)]
pub struct FittedModel {
    layout: DesignLayout,
    beta: Vec<f64>,
    y_scale: f64,
    diagnostics: FitDiagnostics,
}

impl FittedModel {
    /// Point prediction for every row: fitted values on history dates,
    /// out-of-sample forecasts beyond.
    pub fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<ForecastPoint>, CoreError> {
        Ok(self
            .components(rows)?
            .iter()
            .map(ForecastComponents::to_point)
            .collect())
    }

    /// Per-term breakdown of each prediction, in price units.
    pub fn components(&self, rows: &[FeatureRow]) -> Result<Vec<ForecastComponents>, CoreError> {
        rows.iter()
            .map(|row| {
                let features = self.layout.row(row)?;
                let part = |range: std::ops::Range<usize>| {
                    features[range.clone()]
                        .iter()
                        .zip(&self.beta[range])
                        .map(|(f, b)| f * b)
                        .sum::<f64>()
                        * self.y_scale
                };
                let trend = part(self.layout.trend_range());
                let yearly = part(self.layout.yearly_range());
                let weekly = part(self.layout.weekly_range());
                let regressors = part(self.layout.regressor_range());
                Ok(ForecastComponents {
                    date: row.date,
                    trend,
                    weekly,
                    yearly,
                    regressors,
                    yhat: trend + weekly + yearly + regressors,
                })
            })
            .collect()
    }

    pub fn diagnostics(&self) -> &FitDiagnostics {
        &self.diagnostics
    }

    /// Price change per one standard deviation of each regressor.
    pub fn regressor_effects(&self) -> Vec<(Regressor, f64)> {
        self.layout
            .regressors
            .iter()
            .zip(&self.beta[self.layout.regressor_range()])
            .map(|(scale, b)| (scale.regressor, b * self.y_scale))
            .collect()
    }
}

fn rmse(actual: &[f64], fitted: &[f64]) -> f64 {
    let n = actual.len();
    if n == 0 {
        return 0.0;
    }
    let sse: f64 = actual
        .iter()
        .zip(fitted)
        .map(|(a, f)| (a - f).powi(2))
        .sum();
    (sse / n as f64).sqrt()
}

fn r_squared(actual: &[f64], fitted: &[f64]) -> Option<f64> {
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return None;
    }
    let ss_res: f64 = actual.iter().zip(fitted).map(|(a, f)| (a - f).powi(2)).sum();
    Some(1.0 - ss_res / ss_tot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn daily(n: usize, step_days: i64, price: impl Fn(usize) -> f64) -> Vec<FeatureRow> {
        let base = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        (0..n)
            .map(|i| FeatureRow {
                date: base + Duration::days(i as i64 * step_days),
                price: Some(price(i)),
                volume: Some(1_000.0 + (i % 5) as f64 * 10.0),
                sentiment: Some(0.2),
            })
            .collect()
    }

    fn horizon_after(rows: &[FeatureRow], n: usize) -> Vec<FeatureRow> {
        let last = rows[rows.len() - 1];
        (1..=n)
            .map(|i| FeatureRow {
                date: last.date + Duration::days(i as i64),
                price: None,
                ..last
            })
            .collect()
    }

    #[test]
    fn single_point_is_insufficient() {
        let rows = daily(1, 1, |_| 100.0);
        let err = ForecastModel::default().fit(&rows).unwrap_err();
        assert_eq!(err, CoreError::InsufficientData { needed: 2, got: 1 });
    }

    #[test]
    fn two_points_fit() {
        let rows = daily(2, 1, |i| 100.0 + i as f64);
        let fitted = ForecastModel::default().fit(&rows).unwrap();
        let preds = fitted.predict(&horizon_after(&rows, 3)).unwrap();
        assert_eq!(preds.len(), 3);
        assert!(preds.iter().all(|p| p.predicted_price.is_finite()));
        assert_eq!(fitted.diagnostics().changepoints, 0);
    }

    #[test]
    fn configured_min_history_is_enforced() {
        let model = ForecastModel::new(ForecastConfig {
            min_history: 30,
            ..ForecastConfig::default()
        });
        let err = model.fit(&daily(10, 1, |_| 1.0)).unwrap_err();
        assert_eq!(err, CoreError::InsufficientData { needed: 30, got: 10 });
    }

    #[test]
    fn unpriced_rows_are_dropped() {
        let mut rows = daily(3, 1, |i| 100.0 + i as f64);
        rows[1].price = None;
        let fitted = ForecastModel::default().fit(&rows).unwrap();
        assert_eq!(fitted.diagnostics().rows, 2);
    }

    #[test]
    fn missing_history_regressor_fails_fit() {
        let mut rows = daily(5, 1, |i| 100.0 + i as f64);
        rows[2].sentiment = None;
        let err = ForecastModel::default().fit(&rows).unwrap_err();
        assert_eq!(
            err,
            CoreError::MissingRegressor {
                regressor: "sentiment".into(),
                date: rows[2].date,
            }
        );
    }

    #[test]
    fn missing_horizon_regressor_fails_predict() {
        let rows = daily(20, 1, |i| 100.0 + i as f64);
        let fitted = ForecastModel::default().fit(&rows).unwrap();
        let mut future = horizon_after(&rows, 2);
        future[1].volume = None;
        assert!(matches!(
            fitted.predict(&future),
            Err(CoreError::MissingRegressor { .. })
        ));
    }

    #[test]
    fn linear_history_extrapolates_linearly() {
        let config = ForecastConfig {
            yearly_seasonality: Seasonality::Disabled,
            weekly_seasonality: Seasonality::Disabled,
            regressors: vec![],
            ..ForecastConfig::default()
        };
        let rows = daily(200, 1, |i| 100.0 + 0.5 * i as f64);
        let fitted = ForecastModel::new(config).fit(&rows).unwrap();

        let future = horizon_after(&rows, 10);
        let preds = fitted.predict(&future).unwrap();
        // Day 209 on the line y = 100 + 0.5 * day.
        assert!((preds[9].predicted_price - 204.5).abs() < 0.5);
        assert!(fitted.diagnostics().r_squared.unwrap() > 0.999);
    }

    #[test]
    fn components_sum_to_prediction() {
        let rows = daily(120, 1, |i| 50.0 + (i as f64 * 0.3).sin() * 2.0 + i as f64 * 0.1);
        let fitted = ForecastModel::default().fit(&rows).unwrap();
        for c in fitted.components(&rows).unwrap() {
            assert!((c.trend + c.seasonal() + c.regressors - c.yhat).abs() < 1e-9);
        }
        assert_eq!(fitted.regressor_effects().len(), 2);
    }

    #[test]
    fn auto_seasonality_follows_span_and_spacing() {
        let short_daily = ForecastModel::default()
            .fit(&daily(60, 1, |i| 10.0 + i as f64))
            .unwrap();
        assert!(short_daily.diagnostics().weekly_seasonality);
        assert!(!short_daily.diagnostics().yearly_seasonality);

        let weekly_spaced = ForecastModel::default()
            .fit(&daily(120, 7, |i| 10.0 + i as f64))
            .unwrap();
        assert!(!weekly_spaced.diagnostics().weekly_seasonality);
        assert!(weekly_spaced.diagnostics().yearly_seasonality);
    }

    #[test]
    fn forced_seasonality_overrides_auto() {
        let config = ForecastConfig {
            yearly_seasonality: Seasonality::Enabled,
            weekly_seasonality: Seasonality::Disabled,
            ..ForecastConfig::default()
        };
        let fitted = ForecastModel::new(config)
            .fit(&daily(60, 1, |i| 10.0 + i as f64))
            .unwrap();
        assert!(fitted.diagnostics().yearly_seasonality);
        assert!(!fitted.diagnostics().weekly_seasonality);
    }

    #[test]
    fn invalid_hyperparameters_rejected() {
        let config = ForecastConfig {
            changepoint_prior_scale: 0.0,
            ..ForecastConfig::default()
        };
        assert!(matches!(
            ForecastModel::new(config).fit(&daily(10, 1, |_| 1.0)),
            Err(CoreError::InvalidParameter(_))
        ));
    }

    #[test]
    fn seasonality_parses_lowercase() {
        let s: Seasonality = serde_json::from_str("\"enabled\"").unwrap();
        assert_eq!(s, Seasonality::Enabled);
        assert_eq!(serde_json::to_string(&Seasonality::Auto).unwrap(), "\"auto\"");
    }
}
