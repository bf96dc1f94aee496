use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;
use crate::geo::transform::{WGS84_A_KM, WGS84_E2};

/// A ground observer on the WGS84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ObserverLocation {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: f64,
}

impl Default for ObserverLocation {
    fn default() -> Self {
        Self {
            latitude_deg: 0.0,
            longitude_deg: 0.0,
            altitude_m: 0.0,
        }
    }
}

impl ObserverLocation {
    pub fn new(
        latitude_deg: f64,
        longitude_deg: f64,
        altitude_m: f64,
    ) -> Result<Self, ValidationError> {
        let location = Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        };
        location.validate()?;
        Ok(location)
    }

    /// Checks bounds again; the fields are public and may be set directly.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check_range("latitude", self.latitude_deg, -90.0, 90.0)?;
        ValidationError::check_range("longitude", self.longitude_deg, -180.0, 180.0)?;
        if !self.altitude_m.is_finite() {
            return Err(ValidationError::NotFinite { field: "altitude" });
        }
        Ok(())
    }

    /// Parses `"lat, lon"` as written in the config file.
    pub fn from_coordinates(
        coordinates: &str,
        altitude_m: Option<f64>,
    ) -> Result<Self, ValidationError> {
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return Err(ValidationError::Invalid(format!(
                "expected \"lat, lon\", got {:?}",
                coordinates
            )));
        }
        let parse = |field: &str, s: &str| {
            s.parse::<f64>()
                .map_err(|_| ValidationError::Invalid(format!("invalid {}: {:?}", field, s)))
        };
        let lat = parse("latitude", parts[0])?;
        let lon = parse("longitude", parts[1])?;
        Self::new(lat, lon, altitude_m.unwrap_or(0.0))
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        let alt_km = self.altitude_m / 1000.0;
        let x = (n + alt_km) * cos_lat * cos_lon;
        let y = (n + alt_km) * cos_lat * sin_lon;
        let z = (n * (1.0 - WGS84_E2) + alt_km) * sin_lat;
        [x, y, z]
    }
}
