//! Integration tests for the single-symbol pipeline and batch runs.
//!
//! Prices and headlines come from in-memory sources so every run is
//! deterministic and offline.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use pricecast_core::data::{DataSource, StaticHeadlineSource, StaticPriceSource};
use pricecast_core::domain::PricePoint;
use pricecast_core::sentiment::LexiconAnalyzer;
use pricecast_runner::{run_batch, run_symbol, PipelineConfig, PipelineError, Sources};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// Weekday closes on a gentle uptrend with a small deterministic wiggle.
fn trending_prices(start: NaiveDate, days: i64, base: f64) -> Vec<PricePoint> {
    (0..days)
        .map(|i| start + Duration::days(i))
        .filter(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
        .enumerate()
        .map(|(i, date)| {
            let wiggle = ((i % 7) as f64 - 3.0) * 0.2;
            PricePoint::new(date, base + i as f64 * 0.5 + wiggle, 1_000_000.0 + i as f64)
        })
        .collect()
}

fn price_source() -> StaticPriceSource {
    StaticPriceSource::new()
        .with_symbol("AAPL", trending_prices(d(2023, 1, 2), 200, 150.0))
        .with_symbol("TSLA", trending_prices(d(2023, 1, 2), 200, 200.0))
        .with_symbol("TINY", trending_prices(d(2023, 1, 2), 10, 50.0))
}

fn headline_source() -> StaticHeadlineSource {
    StaticHeadlineSource::new()
        .with_symbol("AAPL", ["Apple posts record quarter", "Strong iPhone demand"])
        .with_symbol("TSLA", ["Tesla recall is a terrible loss"])
}

fn config(symbols: &[&str]) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.run.symbols = symbols.iter().map(|s| s.to_string()).collect();
    config.run.start_date = d(2023, 1, 1);
    config.run.end_date = d(2023, 12, 31);
    config.indicators.short_window = 5;
    config.indicators.long_window = 10;
    config.forecast.horizon_days = 30;
    config
}

#[test]
fn single_symbol_run_produces_full_tables() {
    let prices = price_source();
    let headlines = headline_source();
    let scorer = LexiconAnalyzer::new();
    let sources = Sources {
        prices: Some(&prices),
        headlines: Some(&headlines),
        scorer: &scorer,
    };

    let run = run_symbol("AAPL", &config(&["AAPL"]), &sources).unwrap();
    let report = &run.report;

    assert_eq!(report.source, DataSource::InMemory);
    assert_eq!(report.horizon_days, 30);
    assert_eq!(run.indicators.len(), report.observations);
    assert_eq!(run.forecast.len(), report.observations + 30);
    assert_eq!(run.horizon().count(), 30);

    // Positive headlines, rising prices
    assert!(report.sentiment.score > 0.0);
    assert_eq!(report.sentiment.headlines_used, 2);
    assert_eq!(report.uptrend, Some(true));
    assert!(report.latest_volatility.is_some());

    assert_eq!(
        report.forecast_end.date,
        report.history_end + Duration::days(30)
    );
    assert!(report.forecast_end.predicted_price.is_finite());
    // First close was 150 and the series only rises
    assert!(
        report.forecast_end.predicted_price > 150.0,
        "trend should carry the forecast upward: {}",
        report.forecast_end.predicted_price
    );
}

#[test]
fn missing_headlines_score_neutral() {
    let prices = price_source();
    let scorer = LexiconAnalyzer::new();
    let sources = Sources {
        prices: Some(&prices),
        headlines: None,
        scorer: &scorer,
    };

    let run = run_symbol("TSLA", &config(&["TSLA"]), &sources).unwrap();
    assert_eq!(run.report.sentiment.score, 0.0);
    assert_eq!(run.report.sentiment.headlines_used, 0);
}

#[test]
fn short_history_is_rejected_before_fitting() {
    let prices = price_source();
    let scorer = LexiconAnalyzer::new();
    let sources = Sources {
        prices: Some(&prices),
        headlines: None,
        scorer: &scorer,
    };

    let err = run_symbol("TINY", &config(&["TINY"]), &sources).unwrap_err();
    assert!(
        matches!(err, PipelineError::InsufficientHistory { needed: 30, .. }),
        "{err}"
    );
}

#[test]
fn batch_isolates_failures_and_keeps_order() {
    let prices = price_source();
    let headlines = headline_source();
    let scorer = LexiconAnalyzer::new();
    let sources = Sources {
        prices: Some(&prices),
        headlines: Some(&headlines),
        scorer: &scorer,
    };

    let config = config(&["TSLA", "MISSING", "AAPL", "TINY"]);
    let outcome = run_batch(&config, &sources).unwrap();

    let ok: Vec<&str> = outcome.runs.iter().map(|r| r.symbol()).collect();
    assert_eq!(ok, vec!["TSLA", "AAPL"]);

    let failed: Vec<&str> = outcome.failures.iter().map(|f| f.symbol.as_str()).collect();
    assert_eq!(failed, vec!["MISSING", "TINY"]);
    assert!(outcome.has_failures());
    assert!(outcome.failures[0].error.contains("MISSING"));

    let report = outcome.report(&config);
    assert_eq!(report.run_id, config.run_id());
    assert!(!report.has_synthetic);
    assert_eq!(report.symbols.len(), 2);
}

#[test]
fn parallel_and_sequential_batches_agree() {
    let prices = price_source();
    let headlines = headline_source();
    let scorer = LexiconAnalyzer::new();
    let sources = Sources {
        prices: Some(&prices),
        headlines: Some(&headlines),
        scorer: &scorer,
    };

    let mut parallel = config(&["AAPL", "TSLA"]);
    parallel.run.parallel = true;
    let mut sequential = parallel.clone();
    sequential.run.parallel = false;

    let a = run_batch(&parallel, &sources).unwrap();
    let b = run_batch(&sequential, &sources).unwrap();

    assert_eq!(a.runs.len(), b.runs.len());
    for (x, y) in a.runs.iter().zip(&b.runs) {
        assert_eq!(x.report, y.report);
        assert_eq!(x.forecast, y.forecast);
    }
}

#[test]
fn synthetic_fallback_is_flagged_in_report() {
    let scorer = LexiconAnalyzer::new();
    let sources = Sources {
        prices: None,
        headlines: None,
        scorer: &scorer,
    };

    let mut config = config(&["SYNTH"]);
    config.data.synthetic = true;
    let outcome = run_batch(&config, &sources).unwrap();

    assert!(!outcome.has_failures());
    assert_eq!(outcome.runs[0].report.source, DataSource::Synthetic);
    assert!(outcome.report(&config).has_synthetic);
}

#[test]
fn invalid_config_fails_whole_batch() {
    let scorer = LexiconAnalyzer::new();
    let sources = Sources {
        prices: None,
        headlines: None,
        scorer: &scorer,
    };

    let mut config = config(&["AAPL"]);
    config.forecast.horizon_days = 0;
    assert!(run_batch(&config, &sources).is_err());
}
