use thiserror::Error;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VisibilityError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("query cancelled")]
    Cancelled,
}
