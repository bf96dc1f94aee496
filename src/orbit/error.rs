use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrbitError {
    #[error("malformed elements: {0}")]
    MalformedElements(String),
    #[error("propagation error: {0}")]
    Propagation(String),
}

impl From<sgp4::TleError> for OrbitError {
    fn from(err: sgp4::TleError) -> Self {
        OrbitError::MalformedElements(err.to_string())
    }
}

impl From<sgp4::ElementsError> for OrbitError {
    fn from(err: sgp4::ElementsError) -> Self {
        OrbitError::MalformedElements(err.to_string())
    }
}

impl From<sgp4::Error> for OrbitError {
    fn from(err: sgp4::Error) -> Self {
        OrbitError::Propagation(err.to_string())
    }
}
