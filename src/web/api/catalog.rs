use axum::{
    extract::{Path, State},
    Json,
};

use crate::catalog::{Category, CategoryStatus, RefreshReport};
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[utoipa::path(
    post,
    path = "/api/catalog/{category}/refresh",
    params(("category" = String, Path, description = "Category key, e.g. stations")),
    responses(
        (status = 200, description = "Category refreshed", body = RefreshReport),
        (status = 502, description = "Source failed or returned nothing usable", body = ErrorResponse),
        (status = 504, description = "Source timed out", body = ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn refresh_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ApiResult<Json<RefreshReport>> {
    let category = Category::from_key(&category);
    let report = state.catalog.refresh(category).await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/catalog/status",
    responses(
        (status = 200, description = "Per-category freshness", body = Vec<CategoryStatus>)
    ),
    tag = "catalog"
)]
pub async fn status(State(state): State<AppState>) -> Json<Vec<CategoryStatus>> {
    Json(state.catalog.status())
}
