use std::time::Duration;

use thiserror::Error;

use crate::catalog::Category;

/// Failure talking to the element-set source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    #[error("element file error: {0}")]
    Io(String),
    #[error("no valid element sets for {category} ({skipped} malformed)")]
    Empty { category: Category, skipped: usize },
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        FetchError::Io(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("satellite {0} not found")]
    NotFound(u32),
    #[error("catalog is empty: no category has been refreshed yet")]
    Empty,
    #[error("category {0} has not been refreshed yet")]
    NotLoaded(Category),
}
