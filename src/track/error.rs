use thiserror::Error;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("satellite {0} not found")]
    NotFound(u32),
    #[error("catalog is empty: no category has been refreshed yet")]
    CatalogEmpty,
}
