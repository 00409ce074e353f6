//! Headline sources.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::provider::{DataError, HeadlineSource};

/// `{dir}/{SYMBOL}.txt`, one headline per non-blank line. A missing file
/// means no headlines.
pub struct FileHeadlineSource {
    dir: PathBuf,
}

impl FileHeadlineSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.txt"))
    }
}

impl HeadlineSource for FileHeadlineSource {
    fn name(&self) -> &str {
        "file"
    }

    fn headlines(&self, symbol: &str) -> Result<Vec<String>, DataError> {
        read_headlines(&self.path_for(symbol))
    }
}

/// Non-blank, trimmed lines of `path`; an absent file yields an empty list.
pub fn read_headlines(path: &Path) -> Result<Vec<String>, DataError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(DataError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}

/// In-memory headlines keyed by symbol. Unknown symbols have none.
#[derive(Debug, Clone, Default)]
pub struct StaticHeadlineSource {
    headlines: HashMap<String, Vec<String>>,
}

impl StaticHeadlineSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbol<S: Into<String>>(
        mut self,
        symbol: &str,
        headlines: impl IntoIterator<Item = S>,
    ) -> Self {
        self.headlines.insert(
            symbol.to_string(),
            headlines.into_iter().map(Into::into).collect(),
        );
        self
    }
}

impl HeadlineSource for StaticHeadlineSource {
    fn name(&self) -> &str {
        "static"
    }

    fn headlines(&self, symbol: &str) -> Result<Vec<String>, DataError> {
        Ok(self.headlines.get(symbol).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_source_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("AAPL.txt"),
            "Apple beats estimates\n\n   \n  iPhone sales surge  \n",
        )
        .unwrap();

        let source = FileHeadlineSource::new(dir.path());
        assert_eq!(
            source.headlines("AAPL").unwrap(),
            vec!["Apple beats estimates", "iPhone sales surge"]
        );
    }

    #[test]
    fn missing_file_means_no_headlines() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileHeadlineSource::new(dir.path());
        assert!(source.headlines("TSLA").unwrap().is_empty());
    }

    #[test]
    fn static_source_lookup() {
        let source = StaticHeadlineSource::new().with_symbol("AAPL", ["a", "b"]);
        assert_eq!(source.headlines("AAPL").unwrap().len(), 2);
        assert!(source.headlines("MSFT").unwrap().is_empty());
    }
}
