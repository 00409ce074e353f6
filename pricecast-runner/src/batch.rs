//! Multi-symbol runs.
//!
//! Symbols run on the rayon pool (or sequentially when `parallel = false`).
//! Each worker owns its own tables and fitted model; results come back in
//! configured symbol order. A failing symbol becomes a [`SymbolFailure`] and
//! never stops the others.

use pricecast_core::data::DataSource;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, PipelineConfig, RunId};
use crate::pipeline::{run_symbol, PipelineError, Sources, SymbolReport, SymbolRun};

/// Current run report schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// A symbol that could not be forecast, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolFailure {
    pub symbol: String,
    pub error: String,
}

/// In-memory result of a batch: full tables for successes, reasons for failures.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub run_id: RunId,
    pub runs: Vec<SymbolRun>,
    pub failures: Vec<SymbolFailure>,
}

impl BatchOutcome {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn report(&self, config: &PipelineConfig) -> RunReport {
        RunReport {
            schema_version: SCHEMA_VERSION,
            run_id: self.run_id.clone(),
            generated_at: chrono::Local::now().naive_local(),
            config: config.clone(),
            has_synthetic: self
                .runs
                .iter()
                .any(|r| r.report.source == DataSource::Synthetic),
            symbols: self.runs.iter().map(|r| r.report.clone()).collect(),
            failures: self.failures.clone(),
        }
    }
}

/// Persisted summary of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: RunId,
    pub generated_at: chrono::NaiveDateTime,
    pub config: PipelineConfig,
    pub has_synthetic: bool,
    pub symbols: Vec<SymbolReport>,
    pub failures: Vec<SymbolFailure>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Validate the config, then run every configured symbol.
pub fn run_batch(
    config: &PipelineConfig,
    sources: &Sources<'_>,
) -> Result<BatchOutcome, ConfigError> {
    config.validate()?;
    let run_id = config.run_id();
    let symbols = &config.run.symbols;

    tracing::info!(
        run_id = &run_id[..12],
        symbols = symbols.len(),
        parallel = config.run.parallel,
        "starting batch"
    );

    let run_one = |symbol: &String| (symbol.clone(), run_symbol(symbol, config, sources));
    let results: Vec<(String, Result<SymbolRun, PipelineError>)> = if config.run.parallel {
        symbols.par_iter().map(run_one).collect()
    } else {
        symbols.iter().map(run_one).collect()
    };

    let mut runs = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (symbol, result) in results {
        match result {
            Ok(run) => runs.push(run),
            Err(e) => {
                tracing::warn!(%symbol, error = %e, "symbol failed");
                failures.push(SymbolFailure {
                    symbol,
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        succeeded = runs.len(),
        failed = failures.len(),
        "batch complete"
    );

    Ok(BatchOutcome {
        run_id,
        runs,
        failures,
    })
}
