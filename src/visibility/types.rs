use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::geo::ObserverLocation;

/// One satellite above the elevation threshold.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct VisibleSatelliteRecord {
    pub catalog_id: u32,
    pub name: String,
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub range_km: f64,
    pub sub_latitude: f64,
    pub sub_longitude: f64,
    pub altitude_km: f64,
}

/// A satellite that could not be evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SkippedSatellite {
    pub catalog_id: u32,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy)]
pub struct VisibilityQuery {
    pub observer: ObserverLocation,
    pub at: DateTime<Utc>,
    pub min_elevation_deg: f64,
    /// Keep only the K highest satellites.
    pub limit: Option<usize>,
}

impl VisibilityQuery {
    pub fn new(observer: ObserverLocation, at: DateTime<Utc>) -> Self {
        Self {
            observer,
            at,
            min_elevation_deg: super::DEFAULT_MIN_ELEVATION_DEG,
            limit: None,
        }
    }

    pub fn min_elevation(mut self, deg: f64) -> Self {
        self.min_elevation_deg = deg;
        self
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VisibilityReport {
    pub timestamp: DateTime<Utc>,
    pub observer: ObserverLocation,
    pub min_elevation_deg: f64,
    /// Number of satellites evaluated, including skipped ones.
    pub evaluated: usize,
    pub satellites: Vec<VisibleSatelliteRecord>,
    pub skipped: Vec<SkippedSatellite>,
}
