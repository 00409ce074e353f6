//! Criterion benchmarks for PriceCast hot paths.
//!
//! Benchmarks:
//! 1. Indicator table (SMA 20/50, EMA, volatility, normalized)
//! 2. Headline scoring
//! 3. Forecast model fit on one and four years of daily history
//! 4. 365-day horizon prediction

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use pricecast_core::data::SyntheticPriceSource;
use pricecast_core::domain::PricePoint;
use pricecast_core::features::assemble;
use pricecast_core::forecast::ForecastModel;
use pricecast_core::indicators::compute_indicators;
use pricecast_core::sentiment::score_sentiment;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_prices(years: i32) -> Vec<PricePoint> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2020 + years, 1, 1).unwrap();
    SyntheticPriceSource::new().generate("BENCH", start, end)
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let prices = make_prices(4);
    c.bench_function("indicators_4y", |b| {
        b.iter(|| compute_indicators(black_box(&prices), 20, 50))
    });
}

fn bench_sentiment(c: &mut Criterion) {
    let headlines = [
        "Apple shares surge after record quarterly profit",
        "Analysts downgrade Tesla on weak delivery numbers",
        "Chipmaker warns of shortage but expects strong recovery",
        "Regulators open probe into accounting practices",
        "Markets rally as inflation fears ease!!",
    ];
    c.bench_function("score_5_headlines", |b| {
        b.iter(|| score_sentiment(black_box(&headlines), 5))
    });
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("forecast_fit");
    for years in [1, 4] {
        let prices = make_prices(years);
        let table = assemble(&prices, 0.2).unwrap();
        let model = ForecastModel::default();
        group.bench_with_input(BenchmarkId::from_parameter(years), &table, |b, table| {
            b.iter(|| model.fit(black_box(table.history())))
        });
    }
    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let prices = make_prices(4);
    let table = assemble(&prices, 0.2).unwrap();
    let fitted = ForecastModel::default().fit(table.history()).unwrap();
    let horizon = table.extend_horizon(365).unwrap();
    c.bench_function("predict_365d", |b| {
        b.iter(|| fitted.predict(black_box(&horizon)))
    });
}

criterion_group!(
    benches,
    bench_indicators,
    bench_sentiment,
    bench_fit,
    bench_predict
);
criterion_main!(benches);
