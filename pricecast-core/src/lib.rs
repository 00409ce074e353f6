//! PriceCast Core: domain types, indicators, headline sentiment, regressor
//! assembly and the forecast model.
//!
//! Every stage is a pure, synchronous computation over its inputs:
//! - Indicator Engine: SMA, EMA, rolling volatility, normalized price
//! - Sentiment Scorer: lexicon/rule polarity averaged over a few headlines
//! - Regressor Assembler: feature rows for history and forecast horizon
//! - Forecast Model: piecewise-linear trend + Fourier seasonality + regressors
//!
//! Retrieval lives behind the `PriceSource` / `HeadlineSource` traits in
//! [`data`], so the core runs unchanged on files, fixtures or synthetic data.

pub mod data;
pub mod domain;
pub mod error;
pub mod features;
pub mod forecast;
pub mod indicators;
pub mod sentiment;

pub use error::CoreError;
