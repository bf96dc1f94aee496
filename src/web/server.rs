use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::catalog::{CatalogManager, CatalogRefresher};

use super::api::catalog as catalog_handlers;
use super::api::satellites as satellite_handlers;
use super::api::visible as visible_handlers;
use super::api_doc::ApiDoc;
use super::config::Config;
use super::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Catalog contents
        .route("/api/satellites", get(satellite_handlers::list_satellites))
        .route("/api/satellites/{id}", get(satellite_handlers::get_satellite))
        .route(
            "/api/satellites/{id}/positions",
            get(satellite_handlers::get_positions),
        )
        // Visibility
        .route("/api/visible", get(visible_handlers::visible))
        // Catalog maintenance
        .route(
            "/api/catalog/{category}/refresh",
            post(catalog_handlers::refresh_category),
        )
        .route("/api/catalog/status", get(catalog_handlers::status))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config, catalog: Arc<CatalogManager>) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();

    if !config.catalog.preload.is_empty() {
        CatalogRefresher::new(
            catalog.clone(),
            config.catalog.preload.clone(),
            config.catalog.refresh_interval,
        )
        .start();
    }

    let state = AppState {
        config: Arc::new(config),
        catalog,
    };

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, router(state)).await
}
