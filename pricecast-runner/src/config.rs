//! Serializable pipeline configuration.
//!
//! Loaded once from TOML and passed down explicitly. Every section has
//! defaults, so a partial file (or an empty one) is a valid configuration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pricecast_core::forecast::{ForecastConfig, Regressor, Seasonality};
use pricecast_core::indicators::IndicatorParams;
use pricecast_core::sentiment::DEFAULT_MAX_HEADLINES;

/// Unique identifier for a pipeline run (content-addressable hash).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete configuration for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub run: RunSection,
    pub data: DataSection,
    pub indicators: IndicatorSection,
    pub sentiment: SentimentSection,
    pub forecast: ForecastSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSection {
    pub symbols: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Process symbols on the rayon pool; `false` runs them one after another.
    pub parallel: bool,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            symbols: vec!["AAPL".into(), "TSLA".into()],
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            parallel: true,
        }
    }
}

/// Where inputs come from and where artifacts go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSection {
    /// Directory of `{SYMBOL}.csv` price files.
    pub prices_dir: Option<PathBuf>,
    /// Directory of `{SYMBOL}.txt` headline files.
    pub headlines_dir: Option<PathBuf>,
    /// Generate synthetic prices when no real data is available.
    pub synthetic: bool,
    pub output_dir: PathBuf,
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            prices_dir: None,
            headlines_dir: None,
            synthetic: false,
            output_dir: PathBuf::from("output"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSection {
    pub short_window: usize,
    pub long_window: usize,
    /// Defaults to `short_window`.
    pub ema_span: Option<usize>,
    /// Defaults to `short_window`.
    pub volatility_window: Option<usize>,
}

impl Default for IndicatorSection {
    fn default() -> Self {
        Self {
            short_window: 20,
            long_window: 50,
            ema_span: None,
            volatility_window: None,
        }
    }
}

impl IndicatorSection {
    pub fn params(&self) -> IndicatorParams {
        IndicatorParams {
            ema_span: self.ema_span.unwrap_or(self.short_window),
            volatility_window: self.volatility_window.unwrap_or(self.short_window),
            ..IndicatorParams::new(self.short_window, self.long_window)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentSection {
    pub max_headlines: usize,
}

impl Default for SentimentSection {
    fn default() -> Self {
        Self {
            max_headlines: DEFAULT_MAX_HEADLINES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSection {
    pub horizon_days: usize,
    /// Minimum priced rows before a symbol is forecast at all.
    pub min_history: usize,
    pub yearly_seasonality: Seasonality,
    pub weekly_seasonality: Seasonality,
    pub n_changepoints: usize,
    pub changepoint_range: f64,
    pub changepoint_prior_scale: f64,
    pub seasonality_prior_scale: f64,
    pub regressor_prior_scale: f64,
    pub observation_noise: f64,
    pub regressors: Vec<Regressor>,
}

impl Default for ForecastSection {
    fn default() -> Self {
        let model = ForecastConfig::default();
        Self {
            horizon_days: 365,
            min_history: 30,
            yearly_seasonality: model.yearly_seasonality,
            weekly_seasonality: model.weekly_seasonality,
            n_changepoints: model.n_changepoints,
            changepoint_range: model.changepoint_range,
            changepoint_prior_scale: model.changepoint_prior_scale,
            seasonality_prior_scale: model.seasonality_prior_scale,
            regressor_prior_scale: model.regressor_prior_scale,
            observation_noise: model.observation_noise,
            regressors: model.regressors,
        }
    }
}

impl ForecastSection {
    pub fn model_config(&self) -> ForecastConfig {
        ForecastConfig {
            yearly_seasonality: self.yearly_seasonality,
            weekly_seasonality: self.weekly_seasonality,
            n_changepoints: self.n_changepoints,
            changepoint_range: self.changepoint_range,
            changepoint_prior_scale: self.changepoint_prior_scale,
            seasonality_prior_scale: self.seasonality_prior_scale,
            regressor_prior_scale: self.regressor_prior_scale,
            observation_noise: self.observation_noise,
            regressors: self.regressors.clone(),
            min_history: self.min_history,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.run.symbols.is_empty() {
            return Err(ConfigError::Invalid("no symbols configured".into()));
        }
        if let Some(blank) = self.run.symbols.iter().find(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("blank symbol {blank:?}")));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.run.symbols.iter().find(|s| !seen.insert(s.as_str())) {
            return Err(ConfigError::Invalid(format!("symbol '{dup}' listed twice")));
        }
        if self.run.start_date >= self.run.end_date {
            return Err(ConfigError::Invalid(format!(
                "start_date ({}) must be before end_date ({})",
                self.run.start_date, self.run.end_date
            )));
        }
        self.indicators
            .params()
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("[indicators] {e}")))?;
        if self.forecast.horizon_days == 0 {
            return Err(ConfigError::Invalid(
                "[forecast] horizon_days must be >= 1".into(),
            ));
        }
        if self.forecast.min_history < 2 {
            return Err(ConfigError::Invalid(format!(
                "[forecast] min_history must be >= 2, got {}",
                self.forecast.min_history
            )));
        }
        self.forecast
            .model_config()
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("[forecast] {e}")))?;
        Ok(())
    }

    /// Deterministic hash of the full configuration.
    ///
    /// Two runs with identical configs share a RunId.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"));
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
