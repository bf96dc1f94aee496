mod category;
mod error;
mod manager;
mod parser;
mod refresher;
mod source;

pub use category::Category;
pub use error::{CatalogError, FetchError};
pub use manager::{
    CatalogEntry, CatalogManager, CatalogSnapshot, CategoryStatus, RefreshReport,
    SatelliteSummary, DEFAULT_FETCH_TIMEOUT, DEFAULT_STALE_AFTER,
};
pub use parser::{parse_element_feed, ParsedFeed, SkippedTriplet};
pub use refresher::CatalogRefresher;
pub use source::{CelestrakSource, DirectorySource, ElementSource, CELESTRAK_GP_URL};
