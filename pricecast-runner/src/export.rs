//! Export: indicator tables, forecast tables and the run report.
//!
//! - **Indicators**: one `polars` DataFrame across symbols, aligned on the
//!   union of dates; written as CSV or Parquet
//! - **Forecast**: per-symbol CSV of fitted and horizon values
//! - **JSON**: the run report, round-trippable with schema versioning
//!
//! All persisted reports include a `schema_version` field. Unknown versions
//! are rejected on load.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use polars::prelude::*;
use thiserror::Error;

use pricecast_core::indicators::IndicatorSeries;

use crate::batch::{RunReport, SCHEMA_VERSION};
use crate::pipeline::{ForecastRow, SymbolRun};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataframe error: {0}")]
    Polars(#[from] PolarsError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("symbol '{0}' appears more than once in the indicator table")]
    DuplicateSymbol(String),

    #[error("unsupported schema version {found} (max supported: {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },

    #[error("output is not valid UTF-8")]
    Utf8,
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

// ─── Indicator table ────────────────────────────────────────────────

/// Build the wide indicator table.
///
/// Columns: `date`, then per symbol `SYM`, `SYM_SMA_<short>`,
/// `SYM_SMA_<long>`, `SYM_EMA_<span>`, `SYM_Volatility`, `SYM_Normalized`.
/// Equal short and long windows produce a single SMA column. Dates missing
/// for a symbol are null. Each symbol may appear once.
pub fn indicator_frame(tables: &[(&str, &IndicatorSeries)]) -> Result<DataFrame, ExportError> {
    let mut seen = HashSet::new();
    if let Some((dup, _)) = tables.iter().find(|(symbol, _)| !seen.insert(*symbol)) {
        return Err(ExportError::DuplicateSymbol(dup.to_string()));
    }

    let dates: Vec<NaiveDate> = tables
        .iter()
        .flat_map(|(_, s)| s.dates.iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    // 1970-01-01
    let epoch = NaiveDate::default();
    let day_numbers: Vec<i32> = dates
        .iter()
        .map(|d| (*d - epoch).num_days() as i32)
        .collect();

    let mut columns = vec![Column::new("date".into(), day_numbers).cast(&DataType::Date)?];

    for (symbol, series) in tables {
        let p = series.params;
        let align = |values: &[Option<f64>]| -> Vec<Option<f64>> {
            dates
                .iter()
                .map(|d| {
                    series
                        .dates
                        .binary_search(d)
                        .ok()
                        .and_then(|i| values[i])
                })
                .collect()
        };
        let close: Vec<Option<f64>> = series.close.iter().map(|c| Some(*c)).collect();

        columns.push(Column::new(symbol.to_string().into(), align(&close)));
        columns.push(Column::new(
            format!("{symbol}_SMA_{}", p.short_window).into(),
            align(&series.sma_short),
        ));
        if p.long_window != p.short_window {
            columns.push(Column::new(
                format!("{symbol}_SMA_{}", p.long_window).into(),
                align(&series.sma_long),
            ));
        }
        columns.push(Column::new(
            format!("{symbol}_EMA_{}", p.ema_span).into(),
            align(&series.ema_short),
        ));
        columns.push(Column::new(
            format!("{symbol}_Volatility").into(),
            align(&series.volatility),
        ));
        columns.push(Column::new(
            format!("{symbol}_Normalized").into(),
            align(&series.normalized),
        ));
    }

    Ok(DataFrame::new(columns)?)
}

/// Indicator table for every successful run, in run order.
pub fn indicator_frame_for_runs(runs: &[SymbolRun]) -> Result<DataFrame, ExportError> {
    let tables: Vec<(&str, &IndicatorSeries)> =
        runs.iter().map(|r| (r.symbol(), &r.indicators)).collect();
    indicator_frame(&tables)
}

/// Write a DataFrame as Parquet when `path` ends in `.parquet`, otherwise CSV.
pub fn write_frame(df: &mut DataFrame, path: &Path) -> Result<(), ExportError> {
    let mut file = fs::File::create(path).map_err(io_err(path))?;
    let is_parquet = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));
    if is_parquet {
        ParquetWriter::new(file).finish(df)?;
    } else {
        CsvWriter::new(&mut file).include_header(true).finish(df)?;
    }
    Ok(())
}

// ─── Forecast CSV ───────────────────────────────────────────────────

/// Columns: date, actual, yhat, trend, seasonal, regressors.
/// `actual` is empty on horizon rows.
pub fn export_forecast_csv(rows: &[ForecastRow]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "actual", "yhat", "trend", "seasonal", "regressors"])?;

    for r in rows {
        wtr.write_record([
            &r.date.to_string(),
            &r.actual.map(|a| format!("{a:.6}")).unwrap_or_default(),
            &format!("{:.6}", r.yhat),
            &format!("{:.6}", r.trend),
            &format!("{:.6}", r.seasonal),
            &format!("{:.6}", r.regressors),
        ])?;
    }

    let data = wtr.into_inner().map_err(|e| ExportError::Csv(e.into_error().into()))?;
    String::from_utf8(data).map_err(|_| ExportError::Utf8)
}

// ─── JSON report ────────────────────────────────────────────────────

pub fn export_json(report: &RunReport) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Deserialize a report, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<RunReport, ExportError> {
    let report: RunReport = serde_json::from_str(json)?;
    if report.schema_version > SCHEMA_VERSION {
        return Err(ExportError::UnsupportedSchema {
            found: report.schema_version,
            supported: SCHEMA_VERSION,
        });
    }
    Ok(report)
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a batch run.
///
/// Creates `output_dir/<first 12 chars of run id>/` containing:
/// - `report.json`: the full `RunReport`
/// - `indicators.csv`: wide indicator table across symbols
/// - `<SYMBOL>_forecast.csv`: fitted and horizon values per symbol
///
/// Every artifact is built in memory before anything touches the disk, and
/// `report.json` is written last, so a present report marks a complete set.
///
/// Returns the path to the created directory.
pub fn save_artifacts(
    report: &RunReport,
    runs: &[SymbolRun],
    output_dir: &Path,
) -> Result<PathBuf, ExportError> {
    let report_json = export_json(report)?;
    let mut frame = if runs.is_empty() {
        None
    } else {
        Some(indicator_frame_for_runs(runs)?)
    };
    let forecasts = runs
        .iter()
        .map(|run| -> Result<_, ExportError> {
            Ok((run.symbol(), export_forecast_csv(&run.forecast)?))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let prefix = report.run_id.get(..12).unwrap_or(&report.run_id);
    let run_dir = output_dir.join(prefix);
    fs::create_dir_all(&run_dir).map_err(io_err(&run_dir))?;

    if let Some(frame) = frame.as_mut() {
        write_frame(frame, &run_dir.join("indicators.csv"))?;
    }
    for (symbol, csv) in &forecasts {
        let path = run_dir.join(format!("{symbol}_forecast.csv"));
        fs::write(&path, csv).map_err(io_err(&path))?;
    }

    let report_path = run_dir.join("report.json");
    fs::write(&report_path, report_json).map_err(io_err(&report_path))?;

    tracing::info!(dir = %run_dir.display(), symbols = runs.len(), "artifacts saved");
    Ok(run_dir)
}

/// Load a `RunReport` from an artifact directory's report.json.
pub fn load_report(dir: &Path) -> Result<RunReport, ExportError> {
    let path = dir.join("report.json");
    let json = fs::read_to_string(&path).map_err(io_err(&path))?;
    import_json(&json)
}
