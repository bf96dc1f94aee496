use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::cancel::CancelToken;
use crate::catalog::Category;
use crate::error::ValidationError;
use crate::geo::ObserverLocation;
use crate::visibility::{
    find_visible, VisibilityQuery, VisibilityReport, DEFAULT_MIN_ELEVATION_DEG,
};
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VisibleQuery {
    /// Latitude in degrees; the configured observer when omitted.
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Metres above the ellipsoid.
    pub alt: Option<f64>,
    pub min_elevation: Option<f64>,
    pub limit: Option<usize>,
    pub category: Option<String>,
    /// RFC3339 instant; now when omitted.
    pub at: Option<DateTime<Utc>>,
}

impl VisibleQuery {
    fn observer(
        &self,
        fallback: Option<ObserverLocation>,
    ) -> Result<ObserverLocation, ValidationError> {
        match (self.lat, self.lon, fallback) {
            (Some(lat), Some(lon), _) => ObserverLocation::new(lat, lon, self.alt.unwrap_or(0.0)),
            (None, None, Some(observer)) => Ok(observer),
            _ => Err(ValidationError::Invalid("lat and lon are required".into())),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/visible",
    params(VisibleQuery),
    responses(
        (status = 200, description = "Satellites above the threshold, highest first", body = VisibilityReport),
        (status = 400, description = "Invalid observer or threshold", body = ErrorResponse),
        (status = 503, description = "Catalog not loaded", body = ErrorResponse)
    ),
    tag = "visibility"
)]
pub async fn visible(
    State(state): State<AppState>,
    Query(params): Query<VisibleQuery>,
) -> ApiResult<Json<VisibilityReport>> {
    let observer = params.observer(state.config.default_observer())?;
    let query = VisibilityQuery::new(observer, params.at.unwrap_or_else(Utc::now))
        .min_elevation(params.min_elevation.unwrap_or(DEFAULT_MIN_ELEVATION_DEG))
        .limit(params.limit);

    let category = params.category.as_deref().map(Category::from_key);
    let snapshot = state.catalog.snapshot(category)?;

    // Abandoning the request stops the workers at the next satellite.
    let cancel = CancelToken::new();
    let guard = cancel.drop_guard();
    let report =
        tokio::task::spawn_blocking(move || find_visible(&snapshot, &query, &cancel)).await??;
    guard.disarm();

    Ok(Json(report))
}
