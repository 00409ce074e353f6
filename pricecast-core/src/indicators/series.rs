//! IndicatorSeries: the per-date indicator table for one symbol.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Ema, Indicator, Normalized, Sma, Volatility};
use crate::domain::{closes, PricePoint};
use crate::error::CoreError;

/// Window sizes for the indicator table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorParams {
    pub short_window: usize,
    pub long_window: usize,
    pub ema_span: usize,
    pub volatility_window: usize,
}

impl IndicatorParams {
    /// EMA span and volatility window follow `short_window`.
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self {
            short_window,
            long_window,
            ema_span: short_window,
            volatility_window: short_window,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.short_window == 0 || self.long_window == 0 {
            return Err(CoreError::invalid(format!(
                "windows must be >= 1 (short={}, long={})",
                self.short_window, self.long_window
            )));
        }
        if self.long_window < self.short_window {
            return Err(CoreError::invalid(format!(
                "long_window ({}) must be >= short_window ({})",
                self.long_window, self.short_window
            )));
        }
        if self.ema_span == 0 {
            return Err(CoreError::invalid("ema_span must be >= 1"));
        }
        if self.volatility_window == 0 {
            return Err(CoreError::invalid("volatility_window must be >= 1"));
        }
        Ok(())
    }
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self::new(20, 50)
    }
}

/// Close prices plus derived indicator columns, aligned by index with `dates`.
///
/// `None` marks positions inside an indicator's warm-up window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub params: IndicatorParams,
    pub dates: Vec<NaiveDate>,
    pub close: Vec<f64>,
    pub sma_short: Vec<Option<f64>>,
    pub sma_long: Vec<Option<f64>>,
    pub ema_short: Vec<Option<f64>>,
    pub volatility: Vec<Option<f64>>,
    pub normalized: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// True when the short SMA sits above the long SMA on the last date.
    pub fn is_uptrend(&self) -> Option<bool> {
        let short = (*self.sma_short.last()?)?;
        let long = (*self.sma_long.last()?)?;
        Some(short > long)
    }

    /// Last defined volatility value.
    pub fn latest_volatility(&self) -> Option<f64> {
        self.volatility.iter().rev().find_map(|v| *v)
    }
}

/// Compute the indicator table with EMA span and volatility window equal to
/// `short_window`.
pub fn compute_indicators(
    prices: &[PricePoint],
    short_window: usize,
    long_window: usize,
) -> Result<IndicatorSeries, CoreError> {
    compute_indicators_with(prices, IndicatorParams::new(short_window, long_window))
}

/// Compute the indicator table with explicit parameters.
pub fn compute_indicators_with(
    prices: &[PricePoint],
    params: IndicatorParams,
) -> Result<IndicatorSeries, CoreError> {
    params.validate()?;
    if prices.is_empty() {
        return Err(CoreError::InsufficientData { needed: 1, got: 0 });
    }

    let close = closes(prices);
    let run = |indicator: &dyn Indicator| to_options(indicator.compute(&close));

    Ok(IndicatorSeries {
        params,
        dates: prices.iter().map(|p| p.date).collect(),
        sma_short: run(&Sma::new(params.short_window)),
        sma_long: run(&Sma::new(params.long_window)),
        ema_short: run(&Ema::new(params.ema_span)),
        volatility: run(&Volatility::new(params.volatility_window)),
        normalized: run(&Normalized),
        close,
    })
}

fn to_options(values: Vec<f64>) -> Vec<Option<f64>> {
    values
        .into_iter()
        .map(|v| if v.is_nan() { None } else { Some(v) })
        .collect()
}
