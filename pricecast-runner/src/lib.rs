//! PriceCast Runner: config, data loading, per-symbol pipeline, batch runs, export.
//!
//! This crate builds on `pricecast-core` to provide:
//! - TOML configuration with defaults and validation
//! - Price loading with CSV/in-memory/synthetic fallback
//! - The single-symbol stage chain (indicators → sentiment → forecast)
//! - Parallel multi-symbol batches with per-symbol failure isolation
//! - Artifact export (indicator table, forecast tables, JSON report)

pub mod batch;
pub mod config;
pub mod data_loader;
pub mod export;
pub mod pipeline;

pub use batch::{run_batch, BatchOutcome, RunReport, SymbolFailure, SCHEMA_VERSION};
pub use config::{ConfigError, PipelineConfig, RunId};
pub use data_loader::{load_headlines, load_prices, LoadError, LoadOptions, LoadedPrices};
pub use export::{
    export_forecast_csv, export_json, import_json, indicator_frame, load_report, save_artifacts,
    ExportError,
};
pub use pipeline::{run_symbol, ForecastRow, PipelineError, Sources, SymbolReport, SymbolRun};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn outputs_are_send_sync() {
        assert_send::<SymbolRun>();
        assert_sync::<SymbolRun>();
        assert_send::<PipelineError>();
        assert_send::<RunReport>();
        assert_sync::<PipelineConfig>();
    }

    #[test]
    fn sources_are_shareable_across_workers() {
        assert_send::<Sources<'static>>();
        assert_sync::<Sources<'static>>();
    }
}
