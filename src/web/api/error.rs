use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::catalog::{CatalogError, FetchError};
use crate::error::ValidationError;
use crate::track::TrackError;
use crate::visibility::VisibilityError;

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Catalog(CatalogError),
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        ApiError::Catalog(e)
    }
}

impl From<VisibilityError> for ApiError {
    fn from(e: VisibilityError) -> Self {
        match e {
            VisibilityError::Validation(e) => e.into(),
            VisibilityError::Cancelled => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<TrackError> for ApiError {
    fn from(e: TrackError) -> Self {
        match e {
            TrackError::Validation(e) => e.into(),
            TrackError::NotFound(id) => ApiError::Catalog(CatalogError::NotFound(id)),
            TrackError::CatalogEmpty => ApiError::Catalog(CatalogError::Empty),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl ApiError {
    fn status_and_body(&self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_message("validation_failed", msg),
            ),
            ApiError::Catalog(e) => {
                let (status, error) = match e {
                    CatalogError::NotFound(_) => (StatusCode::NOT_FOUND, "satellite_not_found"),
                    CatalogError::Empty | CatalogError::NotLoaded(_) => {
                        (StatusCode::SERVICE_UNAVAILABLE, "catalog_not_loaded")
                    }
                    CatalogError::Fetch(FetchError::Timeout(_)) => {
                        (StatusCode::GATEWAY_TIMEOUT, "fetch_timeout")
                    }
                    CatalogError::Fetch(_) => (StatusCode::BAD_GATEWAY, "fetch_failed"),
                };
                (status, ErrorResponse::with_message(error, &e.to_string()))
            }
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_message("internal_error", msg),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        if status.is_server_error() {
            log::warn!("{}: {:?}", status, body.message);
        }
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
