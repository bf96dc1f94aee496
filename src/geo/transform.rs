use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::geo::ObserverLocation;
use crate::orbit::EciVector;

// WGS-84 constants
pub const WGS84_A_KM: f64 = 6378.137;
pub const WGS84_F: f64 = 1.0 / 298.257223563;
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

const GEODETIC_TOLERANCE_RAD: f64 = 1e-12;
const GEODETIC_MAX_ITERATIONS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct GeodeticPosition {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

/// Look angles from an observer to a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct TopocentricObservation {
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub range_km: f64,
}

/// Greenwich mean sidereal time in radians.
pub fn gmst(time: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&time.naive_utc()))
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let (sin_gmst, cos_gmst) = gmst.sin_cos();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let (sin_lat, cos_lat) = lat_rad.sin_cos();
    let (sin_lon, cos_lon) = lon_rad.sin_cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

/// Earth-fixed cartesian (km) to WGS84 geodetic coordinates.
pub fn ecef_to_geodetic(ecef: [f64; 3]) -> GeodeticPosition {
    let [x, y, z] = ecef;
    let p = x.hypot(y);
    let lon = y.atan2(x);

    let mut lat = z.atan2(p * (1.0 - WGS84_E2));
    for _ in 0..GEODETIC_MAX_ITERATIONS {
        let sin_lat = lat.sin();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        let next = (z + WGS84_E2 * n * sin_lat).atan2(p);
        let done = (next - lat).abs() < GEODETIC_TOLERANCE_RAD;
        lat = next;
        if done {
            break;
        }
    }

    // Well conditioned at the poles, unlike p / cos(lat) - N.
    let (sin_lat, cos_lat) = lat.sin_cos();
    let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let altitude_km = p * cos_lat + z * sin_lat - n * (1.0 - WGS84_E2 * sin_lat * sin_lat);

    GeodeticPosition {
        latitude_deg: lat.to_degrees(),
        longitude_deg: normalize_longitude(lon.to_degrees()),
        altitude_km,
    }
}

/// The point on the ellipsoid directly beneath the satellite.
pub fn subpoint(eci: &EciVector, time: DateTime<Utc>) -> GeodeticPosition {
    ecef_to_geodetic(teme_to_ecef_position(eci.position_km, gmst(time)))
}

pub fn topocentric(
    eci: &EciVector,
    observer: &ObserverLocation,
    time: DateTime<Utc>,
) -> TopocentricObservation {
    let sat_ecef = teme_to_ecef_position(eci.position_km, gmst(time));
    let sta_ecef = observer.position_ecef_km();

    let dr = [
        sat_ecef[0] - sta_ecef[0],
        sat_ecef[1] - sta_ecef[1],
        sat_ecef[2] - sta_ecef[2],
    ];
    let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();

    let (east, north, up) = ecef_to_enu(dr, observer.lat_rad(), observer.lon_rad());
    let elevation_deg = if range_km > 0.0 {
        (up / range_km).clamp(-1.0, 1.0).asin().to_degrees()
    } else {
        90.0
    };

    TopocentricObservation {
        elevation_deg,
        azimuth_deg: normalize_azimuth(east.atan2(north).to_degrees()),
        range_km,
    }
}

fn normalize_azimuth(deg: f64) -> f64 {
    let az = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if az >= 360.0 {
        0.0
    } else {
        az
    }
}

fn normalize_longitude(deg: f64) -> f64 {
    if deg >= 180.0 {
        deg - 360.0
    } else {
        deg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn eci_at(position_km: [f64; 3], time: DateTime<Utc>) -> EciVector {
        EciVector {
            timestamp: time,
            position_km,
            velocity_km_s: [0.0; 3],
        }
    }

    /// Rotates an Earth-fixed point back into TEME for the given instant.
    fn ecef_to_teme(ecef: [f64; 3], time: DateTime<Utc>) -> [f64; 3] {
        teme_to_ecef_position(ecef, -gmst(time))
    }

    fn ecef_from_geodetic(lat: f64, lon: f64, alt_km: f64) -> [f64; 3] {
        ObserverLocation {
            latitude_deg: lat,
            longitude_deg: lon,
            altitude_m: alt_km * 1000.0,
        }
        .position_ecef_km()
    }

    #[test]
    fn gmst_is_normalized_radians() {
        let t = Utc.with_ymd_and_hms(2024, 3, 20, 0, 0, 0).unwrap();
        let g = gmst(t);
        assert!((0.0..std::f64::consts::TAU).contains(&g));
    }

    #[test]
    fn zenith_target_has_ninety_degree_elevation() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let observer = ObserverLocation::new(40.7128, -74.0060, 0.0).unwrap();
        let target = ecef_from_geodetic(40.7128, -74.0060, 500.0);
        let look = topocentric(&eci_at(ecef_to_teme(target, t), t), &observer, t);
        assert!((look.elevation_deg - 90.0).abs() < 1e-4);
        assert!((look.range_km - 500.0).abs() < 1e-6);
    }

    #[test]
    fn azimuth_is_clockwise_from_north() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let observer = ObserverLocation::new(0.0, 0.0, 0.0).unwrap();

        // due north, east, south, west at 1000 km altitude, a few degrees away
        let cases = [
            ((5.0, 0.0), 0.0),
            ((0.0, 5.0), 90.0),
            ((-5.0, 0.0), 180.0),
            ((0.0, -5.0), 270.0),
        ];
        for ((lat, lon), expected) in cases {
            let target = ecef_from_geodetic(lat, lon, 1000.0);
            let look = topocentric(&eci_at(ecef_to_teme(target, t), t), &observer, t);
            let diff = (look.azimuth_deg - expected).abs();
            assert!(diff < 1e-6 || (360.0 - diff) < 1e-6, "az {} vs {}", look.azimuth_deg, expected);
            assert!(look.elevation_deg > 0.0);
            assert!((0.0..360.0).contains(&look.azimuth_deg));
        }
    }

    #[test]
    fn target_below_horizon_has_negative_elevation() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let observer = ObserverLocation::new(0.0, 0.0, 0.0).unwrap();
        let antipode = ecef_from_geodetic(0.0, 180.0, 400.0);
        let look = topocentric(&eci_at(ecef_to_teme(antipode, t), t), &observer, t);
        assert!(look.elevation_deg < -80.0);
    }

    #[test]
    fn subpoint_recovers_geodetic_coordinates() {
        let t = Utc.with_ymd_and_hms(2024, 6, 1, 6, 30, 0).unwrap();
        let target = ecef_from_geodetic(-23.5, 135.25, 420.0);
        let geo = subpoint(&eci_at(ecef_to_teme(target, t), t), t);
        assert!((geo.latitude_deg + 23.5).abs() < 1e-8);
        assert!((geo.longitude_deg - 135.25).abs() < 1e-8);
        assert!((geo.altitude_km - 420.0).abs() < 1e-6);
    }

    #[test]
    fn longitude_stays_in_half_open_range() {
        assert_eq!(normalize_longitude(180.0), -180.0);
        assert_eq!(normalize_longitude(-180.0), -180.0);
        assert_eq!(normalize_azimuth(-1e-18), 0.0);
        assert_eq!(normalize_azimuth(-90.0), 270.0);
    }
}
