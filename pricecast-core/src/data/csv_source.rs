//! CSV price files: `{dir}/{SYMBOL}.csv` with `date`, `close`, `volume`
//! columns. Header matching is case-insensitive, and `Adj Close` is used when
//! no plain close column exists.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use polars::prelude::*;

use super::provider::{clip_to_range, DataError, DataSource, PriceSource};
use crate::domain::PricePoint;

pub struct CsvPriceSource {
    dir: PathBuf,
}

impl CsvPriceSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `{dir}/{SYMBOL}.csv`
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

impl PriceSource for CsvPriceSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn kind(&self) -> DataSource {
        DataSource::CsvFile
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, DataError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        let prices = read_price_csv(&path)?;
        clip_to_range(symbol, prices, start, end)
    }
}

/// Read every row of a price CSV.
///
/// Rows with a null close are skipped. A priced row with a null volume is a
/// parse error: volume feeds the forecast as a regressor and is never filled in.
pub fn read_price_csv(path: &Path) -> Result<Vec<PricePoint>, DataError> {
    let parse_err = |reason: String| DataError::Parse {
        path: path.to_path_buf(),
        reason,
    };

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| parse_err(format!("open: {e}")))?
        .finish()
        .map_err(|e| parse_err(format!("read: {e}")))?;

    let date_col =
        find_column(&df, &["date"]).ok_or_else(|| parse_err("missing 'date' column".into()))?;
    let close_col = find_column(&df, &["close", "adj close", "adj_close"])
        .ok_or_else(|| parse_err("missing 'close' column".into()))?;
    let volume_col =
        find_column(&df, &["volume"]).ok_or_else(|| parse_err("missing 'volume' column".into()))?;

    let column = |name: &str, dtype: &DataType| -> Result<Column, DataError> {
        df.column(name)
            .and_then(|c| c.cast(dtype))
            .map_err(|e| parse_err(format!("column '{name}': {e}")))
    };

    let dates = column(&date_col, &DataType::String)?;
    let closes = column(&close_col, &DataType::Float64)?;
    let volumes = column(&volume_col, &DataType::Float64)?;

    let date_ca = dates
        .as_materialized_series()
        .str()
        .map_err(|e| parse_err(format!("date column type: {e}")))?;
    let close_ca = closes
        .f64()
        .map_err(|e| parse_err(format!("close column type: {e}")))?;
    let volume_ca = volumes
        .f64()
        .map_err(|e| parse_err(format!("volume column type: {e}")))?;

    let mut prices = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let raw = date_ca
            .get(i)
            .ok_or_else(|| parse_err(format!("null date at row {i}")))?;
        let date =
            parse_date(raw).ok_or_else(|| parse_err(format!("bad date '{raw}' at row {i}")))?;
        let Some(close) = close_ca.get(i) else {
            continue;
        };
        let volume = volume_ca
            .get(i)
            .ok_or_else(|| parse_err(format!("null volume on {date} at row {i}")))?;
        prices.push(PricePoint::new(date, close, volume));
    }
    Ok(prices)
}

fn find_column(df: &DataFrame, candidates: &[&str]) -> Option<String> {
    let names = df.get_column_names();
    candidates.iter().find_map(|want| {
        names
            .iter()
            .find(|n| n.as_str().trim().eq_ignore_ascii_case(want))
            .map(|n| n.to_string())
    })
}

/// `YYYY-MM-DD`, optionally followed by a time part (`2024-01-02 00:00:00-05:00`).
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(dir: &Path, symbol: &str, body: &str) {
        fs::write(dir.join(format!("{symbol}.csv")), body).unwrap();
    }

    fn range() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        )
    }

    #[test]
    fn reads_lowercase_headers() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "AAPL",
            "date,close,volume\n2024-01-03,11.5,200\n2024-01-02,10.0,100\n",
        );
        let (start, end) = range();
        let prices = CsvPriceSource::new(dir.path())
            .fetch("AAPL", start, end)
            .unwrap();

        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(prices[0].close, 10.0);
        assert_eq!(prices[1].volume, 200.0);
    }

    #[test]
    fn reads_capitalized_headers_with_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "TSLA",
            "Date,Open,Close,Volume\n2024-01-02 00:00:00-05:00,1,250.5,1000\n",
        );
        let (start, end) = range();
        let prices = CsvPriceSource::new(dir.path())
            .fetch("TSLA", start, end)
            .unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].close, 250.5);
    }

    #[test]
    fn missing_file_is_symbol_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (start, end) = range();
        let err = CsvPriceSource::new(dir.path())
            .fetch("NOPE", start, end)
            .unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { .. }));
    }

    #[test]
    fn missing_close_column_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "BAD", "date,price,volume\n2024-01-02,1,1\n");
        let (start, end) = range();
        let err = CsvPriceSource::new(dir.path())
            .fetch("BAD", start, end)
            .unwrap_err();
        assert!(err.to_string().contains("missing 'close' column"));
    }

    #[test]
    fn blank_volume_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "GAP",
            "date,close,volume\n2024-01-02,10.0,100\n2024-01-03,11.0,\n",
        );
        let (start, end) = range();
        let err = CsvPriceSource::new(dir.path())
            .fetch("GAP", start, end)
            .unwrap_err();
        assert!(matches!(err, DataError::Parse { .. }));
        assert!(err.to_string().contains("null volume on 2024-01-03"), "{err}");
    }

    #[test]
    fn blank_close_row_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "HOLE",
            "date,close,volume\n2024-01-02,10.0,100\n2024-01-03,,\n2024-01-04,12.0,300\n",
        );
        let (start, end) = range();
        let prices = CsvPriceSource::new(dir.path())
            .fetch("HOLE", start, end)
            .unwrap();
        let volumes: Vec<f64> = prices.iter().map(|p| p.volume).collect();
        assert_eq!(volumes, vec![100.0, 300.0]);
    }

    #[test]
    fn date_parsing() {
        assert_eq!(
            parse_date("2024-02-29"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert!(parse_date("02/29/2024").is_none());
    }
}
