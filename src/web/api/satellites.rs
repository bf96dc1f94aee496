use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::catalog::{CatalogError, Category, SatelliteSummary};
use crate::geo::subpoint;
use crate::track::{self, GroundTrackPoint, DEFAULT_DURATION_MINUTES, DEFAULT_INTERVAL_MINUTES};
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Category key; all loaded categories when omitted.
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DetailQuery {
    /// Attach the current sub-satellite point; on unless set to false.
    #[serde(default = "include_position_default")]
    pub include_position: bool,
}

fn include_position_default() -> bool {
    true
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SatelliteDetail {
    #[serde(flatten)]
    pub summary: SatelliteSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<GroundTrackPoint>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PositionsQuery {
    /// Minutes, 1 to 1440.
    pub duration: Option<u32>,
    /// Minutes between points, 1 to 60.
    pub interval: Option<u32>,
    /// RFC3339 start time; now when omitted.
    pub start: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroundTrackResponse {
    pub catalog_id: u32,
    pub name: String,
    pub color: String,
    pub points: Vec<GroundTrackPoint>,
}

#[utoipa::path(
    get,
    path = "/api/satellites",
    params(ListQuery),
    responses(
        (status = 200, description = "Satellites in the catalog", body = Vec<SatelliteSummary>),
        (status = 503, description = "Catalog not loaded", body = ErrorResponse)
    ),
    tag = "satellites"
)]
pub async fn list_satellites(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<SatelliteSummary>>> {
    let category = query.category.as_deref().map(Category::from_key);
    let snapshot = state.catalog.snapshot(category)?;
    Ok(Json(snapshot.entries().iter().map(|e| e.summary()).collect()))
}

#[utoipa::path(
    get,
    path = "/api/satellites/{id}",
    params(
        ("id" = u32, Path, description = "Catalog number"),
        DetailQuery
    ),
    responses(
        (status = 200, description = "Satellite metadata", body = SatelliteDetail),
        (status = 404, description = "Unknown catalog number", body = ErrorResponse),
        (status = 503, description = "Catalog not loaded", body = ErrorResponse)
    ),
    tag = "satellites"
)]
pub async fn get_satellite(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(query): Query<DetailQuery>,
) -> ApiResult<Json<SatelliteDetail>> {
    if state.catalog.is_empty() {
        return Err(CatalogError::Empty.into());
    }
    let entry = state
        .catalog
        .lookup(id)
        .ok_or(CatalogError::NotFound(id))?;

    let position = if query.include_position {
        let now = Utc::now();
        match entry.model.position_at(now) {
            Ok(eci) => {
                let sub = subpoint(&eci, now);
                Some(GroundTrackPoint {
                    timestamp: now,
                    latitude: sub.latitude_deg,
                    longitude: sub.longitude_deg,
                    altitude_km: sub.altitude_km,
                })
            }
            Err(e) => {
                log::warn!("No current position for {}: {}", id, e);
                None
            }
        }
    } else {
        None
    };

    Ok(Json(SatelliteDetail {
        summary: entry.summary(),
        position,
    }))
}

#[utoipa::path(
    get,
    path = "/api/satellites/{id}/positions",
    params(
        ("id" = u32, Path, description = "Catalog number"),
        PositionsQuery
    ),
    responses(
        (status = 200, description = "Ground track", body = GroundTrackResponse),
        (status = 400, description = "Duration or interval out of range", body = ErrorResponse),
        (status = 404, description = "Unknown catalog number", body = ErrorResponse),
        (status = 503, description = "Catalog not loaded", body = ErrorResponse)
    ),
    tag = "satellites"
)]
pub async fn get_positions(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(query): Query<PositionsQuery>,
) -> ApiResult<Json<GroundTrackResponse>> {
    let start = query.start.unwrap_or_else(Utc::now);
    let duration = query.duration.unwrap_or(DEFAULT_DURATION_MINUTES);
    let interval = query.interval.unwrap_or(DEFAULT_INTERVAL_MINUTES);

    let ground_track = track::sample(&state.catalog, id, start, duration, interval)?;
    let response = tokio::task::spawn_blocking(move || GroundTrackResponse {
        catalog_id: ground_track.catalog_id(),
        name: ground_track.name().to_string(),
        color: ground_track.color().to_string(),
        points: ground_track.points().collect(),
    })
    .await?;

    Ok(Json(response))
}
