//! Price and headline sources.

pub mod csv_source;
pub mod headlines;
pub mod provider;
pub mod static_source;
pub mod synthetic;

pub use csv_source::{read_price_csv, CsvPriceSource};
pub use headlines::{read_headlines, FileHeadlineSource, StaticHeadlineSource};
pub use provider::{clip_to_range, DataError, DataSource, HeadlineSource, PriceSource};
pub use static_source::StaticPriceSource;
pub use synthetic::SyntheticPriceSource;
