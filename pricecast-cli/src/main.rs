//! PriceCast CLI: forecast, indicator, sentiment and config commands.
//!
//! Commands:
//! - `forecast`: run the full pipeline for each symbol and save artifacts
//! - `indicators`: compute the indicator table only
//! - `sentiment`: score headlines from a file or the command line
//! - `config`: print the default configuration as TOML

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use pricecast_core::data::{
    read_headlines, CsvPriceSource, FileHeadlineSource, HeadlineSource, PriceSource,
};
use pricecast_core::indicators::{compute_indicators_with, IndicatorParams};
use pricecast_core::sentiment::{score_headlines, LexiconAnalyzer, DEFAULT_MAX_HEADLINES};
use pricecast_runner::export::{indicator_frame, write_frame};
use pricecast_runner::{
    load_prices, run_batch, save_artifacts, BatchOutcome, LoadOptions, PipelineConfig, Sources,
};

#[derive(Parser)]
#[command(
    name = "pricecast",
    about = "PriceCast CLI: sentiment-augmented price forecasting"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast prices for one or more symbols.
    Forecast {
        /// Path to a TOML config file. Flags below override its values.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Symbols to forecast (e.g., AAPL,TSLA).
        #[arg(long, value_delimiter = ',')]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,

        /// Directory of {SYMBOL}.csv price files.
        #[arg(long)]
        prices_dir: Option<PathBuf>,

        /// Directory of {SYMBOL}.txt headline files.
        #[arg(long)]
        headlines_dir: Option<PathBuf>,

        /// Use synthetic prices when no real data is available.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Forecast horizon in days.
        #[arg(long)]
        horizon: Option<usize>,

        /// Output directory for artifacts.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Process symbols one at a time instead of in parallel.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
    /// Compute SMA/EMA/volatility tables without forecasting.
    Indicators {
        /// Symbols to process.
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 2020-01-01.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to 2024-01-01.
        #[arg(long)]
        end: Option<String>,

        /// Directory of {SYMBOL}.csv price files.
        #[arg(long)]
        prices_dir: Option<PathBuf>,

        /// Use synthetic prices when no real data is available.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        #[arg(long, default_value_t = 20)]
        short: usize,

        #[arg(long, default_value_t = 50)]
        long: usize,

        /// Output file; `.parquet` writes Parquet, anything else CSV.
        #[arg(long, default_value = "indicators.csv")]
        output: PathBuf,
    },
    /// Score headlines and print the aggregate sentiment.
    Sentiment {
        /// Headlines to score.
        headlines: Vec<String>,

        /// Read headlines from a file, one per line.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Only the first N headlines are scored.
        #[arg(long, default_value_t = DEFAULT_MAX_HEADLINES)]
        max: usize,

        /// Print the summary as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the default configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Forecast {
            config,
            symbols,
            start,
            end,
            prices_dir,
            headlines_dir,
            synthetic,
            horizon,
            output_dir,
            sequential,
        } => {
            let mut cfg = match config {
                Some(path) => PipelineConfig::from_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => PipelineConfig::default(),
            };
            if !symbols.is_empty() {
                cfg.run.symbols = symbols;
            }
            if let Some(start) = start.as_deref() {
                cfg.run.start_date = parse_date(start)?;
            }
            if let Some(end) = end.as_deref() {
                cfg.run.end_date = parse_date(end)?;
            }
            if prices_dir.is_some() {
                cfg.data.prices_dir = prices_dir;
            }
            if headlines_dir.is_some() {
                cfg.data.headlines_dir = headlines_dir;
            }
            cfg.data.synthetic |= synthetic;
            if let Some(horizon) = horizon {
                cfg.forecast.horizon_days = horizon;
            }
            if let Some(dir) = output_dir {
                cfg.data.output_dir = dir;
            }
            if sequential {
                cfg.run.parallel = false;
            }
            run_forecast_cmd(&cfg)
        }
        Commands::Indicators {
            symbols,
            start,
            end,
            prices_dir,
            synthetic,
            short,
            long,
            output,
        } => run_indicators_cmd(
            &symbols, start, end, prices_dir, synthetic, short, long, &output,
        ),
        Commands::Sentiment {
            headlines,
            file,
            max,
            json,
        } => run_sentiment_cmd(headlines, file, max, json),
        Commands::Config => {
            print!("{}", PipelineConfig::default().to_toml()?);
            Ok(())
        }
    }
}

/// Directives from `RUST_LOG` when present and valid, otherwise `info`.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}

fn run_forecast_cmd(config: &PipelineConfig) -> Result<()> {
    let prices = config.data.prices_dir.as_ref().map(CsvPriceSource::new);
    let headlines = config.data.headlines_dir.as_ref().map(FileHeadlineSource::new);
    let scorer = LexiconAnalyzer::new();

    let sources = Sources {
        prices: prices.as_ref().map(|p| p as &dyn PriceSource),
        headlines: headlines.as_ref().map(|h| h as &dyn HeadlineSource),
        scorer: &scorer,
    };

    let outcome = run_batch(config, &sources).context("invalid configuration")?;
    print_summary(&outcome);

    let report = outcome.report(config);
    let run_dir = save_artifacts(&report, &outcome.runs, &config.data.output_dir)
        .context("saving artifacts")?;
    println!("Artifacts saved to: {}", run_dir.display());

    if outcome.has_failures() {
        for failure in &outcome.failures {
            eprintln!("Error for {}: {}", failure.symbol, failure.error);
        }
        std::process::exit(1);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_indicators_cmd(
    symbols: &[String],
    start: Option<String>,
    end: Option<String>,
    prices_dir: Option<PathBuf>,
    synthetic: bool,
    short: usize,
    long: usize,
    output: &Path,
) -> Result<()> {
    let defaults = PipelineConfig::default().run;
    let opts = LoadOptions {
        start: start
            .as_deref()
            .map(parse_date)
            .transpose()?
            .unwrap_or(defaults.start_date),
        end: end
            .as_deref()
            .map(parse_date)
            .transpose()?
            .unwrap_or(defaults.end_date),
        synthetic,
    };
    if opts.start >= opts.end {
        bail!("--start ({}) must be before --end ({})", opts.start, opts.end);
    }

    let source = prices_dir.map(CsvPriceSource::new);
    let params = IndicatorParams::new(short, long);

    let mut tables = Vec::with_capacity(symbols.len());
    for (i, symbol) in symbols.iter().enumerate() {
        if symbols[..i].contains(symbol) {
            tracing::warn!(%symbol, "symbol listed twice; skipping repeat");
            continue;
        }
        let loaded = load_prices(symbol, source.as_ref().map(|s| s as &dyn PriceSource), &opts)?;
        let series = compute_indicators_with(&loaded.prices, params)
            .with_context(|| format!("computing indicators for {symbol}"))?;
        println!(
            "{symbol:<8} {} rows  {} to {}  uptrend: {}",
            series.len(),
            loaded.prices[0].date,
            loaded.prices[loaded.prices.len() - 1].date,
            series
                .is_uptrend()
                .map_or("n/a".to_string(), |up| up.to_string()),
        );
        tables.push((symbol.as_str(), series));
    }

    let refs: Vec<_> = tables.iter().map(|(s, t)| (*s, t)).collect();
    let mut frame = indicator_frame(&refs)?;
    write_frame(&mut frame, output)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Indicators written to: {}", output.display());
    Ok(())
}

fn run_sentiment_cmd(
    mut headlines: Vec<String>,
    file: Option<PathBuf>,
    max: usize,
    json: bool,
) -> Result<()> {
    if let Some(path) = file {
        let mut from_file = read_headlines(&path)
            .with_context(|| format!("reading headlines from {}", path.display()))?;
        from_file.append(&mut headlines);
        headlines = from_file;
    }

    let summary = score_headlines(&LexiconAnalyzer::new(), &headlines, max);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    for (headline, score) in headlines.iter().zip(&summary.headline_scores) {
        println!("{score:>7.3}  {headline}");
    }
    println!(
        "Sentiment: {:.4} ({} headline(s) scored)",
        summary.score, summary.headlines_used
    );
    Ok(())
}

fn print_summary(outcome: &BatchOutcome) {
    for run in &outcome.runs {
        let r = &run.report;
        println!();
        println!("=== {} ===", r.symbol);
        println!(
            "History:        {} to {} ({} rows)",
            r.history_start, r.history_end, r.observations
        );
        println!("Last Close:     {:.2}", r.last_close);
        if let Some(up) = r.uptrend {
            println!("Trend:          {}", if up { "up" } else { "down" });
        }
        if let Some(vol) = r.latest_volatility {
            println!("Volatility:     {vol:.4}");
        }
        println!(
            "Sentiment:      {:.3} ({} headlines)",
            r.sentiment.score, r.sentiment.headlines_used
        );
        println!(
            "Forecast:       {:.2} on {} ({} days)",
            r.forecast_end.predicted_price, r.forecast_end.date, r.horizon_days
        );
        println!("Baseline:       {:.2}", r.baseline_end);
        println!("Fit RMSE:       {:.4}", r.diagnostics.rmse);
        if let Some(r2) = r.diagnostics.r_squared {
            println!("Fit R²:         {r2:.3}");
        }
        if r.source == pricecast_core::data::DataSource::Synthetic {
            println!("WARNING: Results based on SYNTHETIC data");
        }
    }
    println!();
}
