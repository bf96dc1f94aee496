use utoipa::OpenApi;

use crate::web::api::{catalog, satellites, visible};

#[derive(OpenApi)]
#[openapi(
    paths(
        satellites::list_satellites,
        satellites::get_satellite,
        satellites::get_positions,
        visible::visible,
        catalog::refresh_category,
        catalog::status,
    ),
    components(
        schemas(
            satellites::SatelliteDetail,
            satellites::GroundTrackResponse,
            crate::web::api::error::ErrorResponse,
            crate::catalog::Category,
            crate::catalog::SatelliteSummary,
            crate::catalog::RefreshReport,
            crate::catalog::SkippedTriplet,
            crate::catalog::CategoryStatus,
            crate::geo::ObserverLocation,
            crate::track::GroundTrackPoint,
            crate::visibility::VisibilityReport,
            crate::visibility::VisibleSatelliteRecord,
            crate::visibility::SkippedSatellite,
        )
    ),
    info(
        title = "Sat-O-View API",
        description = "Satellite catalog, visibility and ground tracks",
        version = "0.1.0"
    ),
    tags(
        (name = "satellites", description = "Catalog contents and ground tracks"),
        (name = "visibility", description = "Satellites above an observer"),
        (name = "catalog", description = "Element-set refresh")
    )
)]
pub struct ApiDoc;
