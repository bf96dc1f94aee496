use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Sub-satellite position at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct GroundTrackPoint {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_km: f64,
}
