use thiserror::Error;

/// A caller-supplied parameter outside its documented bounds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{0}")]
    Invalid(String),
}

impl ValidationError {
    pub(crate) fn check_range(
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    ) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite { field });
        }
        if value < min || value > max {
            return Err(ValidationError::OutOfRange {
                field,
                min,
                max,
                value,
            });
        }
        Ok(())
    }
}
