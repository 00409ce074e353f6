//! Single-symbol pipeline: prices → indicators → sentiment → features →
//! fitted model → horizon forecast.
//!
//! Each stage runs strictly after the previous one and owns its outputs. A
//! failure aborts this symbol only; the batch runner keeps going.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pricecast_core::data::{DataSource, HeadlineSource, PriceSource};
use pricecast_core::domain::{FeatureRow, ForecastComponents, ForecastPoint};
use pricecast_core::features::assemble;
use pricecast_core::forecast::{FitDiagnostics, ForecastModel, LinearTrendBaseline};
use pricecast_core::indicators::{compute_indicators_with, IndicatorSeries};
use pricecast_core::sentiment::{score_headlines, PolarityModel, SentimentSummary};
use pricecast_core::CoreError;

use crate::config::PipelineConfig;
use crate::data_loader::{load_headlines, load_prices, LoadError, LoadOptions};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Data(#[from] LoadError),

    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("insufficient history for '{symbol}': need {needed} priced rows, got {got}")]
    InsufficientHistory {
        symbol: String,
        needed: usize,
        got: usize,
    },
}

/// Injected capabilities for a run. All are shared read-only across workers.
#[derive(Clone, Copy)]
pub struct Sources<'a> {
    pub prices: Option<&'a dyn PriceSource>,
    pub headlines: Option<&'a dyn HeadlineSource>,
    pub scorer: &'a dyn PolarityModel,
}

/// Summary of one symbol's run, serialized into the run report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolReport {
    pub symbol: String,
    pub source: DataSource,
    pub dataset_hash: String,
    pub history_start: NaiveDate,
    pub history_end: NaiveDate,
    pub observations: usize,
    pub last_close: f64,
    pub uptrend: Option<bool>,
    pub latest_volatility: Option<f64>,
    pub sentiment: SentimentSummary,
    pub diagnostics: FitDiagnostics,
    pub horizon_days: usize,
    /// Model forecast on the last horizon date.
    pub forecast_end: ForecastPoint,
    /// Straight-line trend value on the same date.
    pub baseline_end: f64,
}

/// One row of the per-symbol forecast table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub date: NaiveDate,
    /// Observed close; `None` on horizon rows.
    pub actual: Option<f64>,
    pub yhat: f64,
    pub trend: f64,
    pub seasonal: f64,
    pub regressors: f64,
}

impl ForecastRow {
    fn from_parts(row: &FeatureRow, c: &ForecastComponents) -> Self {
        Self {
            date: c.date,
            actual: row.price,
            yhat: c.yhat,
            trend: c.trend,
            seasonal: c.seasonal(),
            regressors: c.regressors,
        }
    }
}

/// Everything one symbol produced: the report plus the full tables.
#[derive(Debug, Clone)]
pub struct SymbolRun {
    pub report: SymbolReport,
    pub indicators: IndicatorSeries,
    pub forecast: Vec<ForecastRow>,
}

impl SymbolRun {
    pub fn symbol(&self) -> &str {
        &self.report.symbol
    }

    /// Horizon rows only.
    pub fn horizon(&self) -> impl Iterator<Item = &ForecastRow> {
        self.forecast.iter().filter(|r| r.actual.is_none())
    }
}

/// Run the full stage chain for one symbol.
pub fn run_symbol(
    symbol: &str,
    config: &PipelineConfig,
    sources: &Sources<'_>,
) -> Result<SymbolRun, PipelineError> {
    let span = tracing::info_span!("symbol", %symbol);
    let _guard = span.enter();

    let opts = LoadOptions {
        start: config.run.start_date,
        end: config.run.end_date,
        synthetic: config.data.synthetic,
    };
    let loaded = load_prices(symbol, sources.prices, &opts)?;
    let prices = &loaded.prices;

    let needed = config.forecast.min_history;
    if prices.len() < needed {
        return Err(PipelineError::InsufficientHistory {
            symbol: symbol.to_string(),
            needed,
            got: prices.len(),
        });
    }

    let indicators = compute_indicators_with(prices, config.indicators.params())?;

    let headlines = load_headlines(symbol, sources.headlines);
    let sentiment = score_headlines(sources.scorer, &headlines, config.sentiment.max_headlines);
    tracing::debug!(
        score = sentiment.score,
        headlines = sentiment.headlines_used,
        "sentiment scored"
    );

    let table = assemble(prices, sentiment.score)?;
    let fitted = ForecastModel::new(config.forecast.model_config()).fit(table.history())?;
    let baseline = LinearTrendBaseline::fit(table.history())?;

    let frame = table.future_frame(config.forecast.horizon_days)?;
    let components = fitted.components(&frame)?;
    let forecast: Vec<ForecastRow> = frame
        .iter()
        .zip(&components)
        .map(|(row, c)| ForecastRow::from_parts(row, c))
        .collect();

    let forecast_end = components
        .last()
        .map(ForecastComponents::to_point)
        .ok_or_else(|| CoreError::InvalidParameter("empty forecast frame".into()))?;
    let baseline_end = baseline.value_at(forecast_end.date);

    let first = prices[0];
    let last = prices[prices.len() - 1];
    let report = SymbolReport {
        symbol: symbol.to_string(),
        source: loaded.source,
        dataset_hash: loaded.dataset_hash.clone(),
        history_start: first.date,
        history_end: last.date,
        observations: prices.len(),
        last_close: last.close,
        uptrend: indicators.is_uptrend(),
        latest_volatility: indicators.latest_volatility(),
        sentiment,
        diagnostics: fitted.diagnostics().clone(),
        horizon_days: config.forecast.horizon_days,
        forecast_end,
        baseline_end,
    };

    tracing::info!(
        rows = report.observations,
        last_close = report.last_close,
        forecast = report.forecast_end.predicted_price,
        forecast_date = %report.forecast_end.date,
        rmse = report.diagnostics.rmse,
        "forecast complete"
    );

    Ok(SymbolRun {
        report,
        indicators,
        forecast,
    })
}
