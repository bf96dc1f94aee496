mod observer;
mod transform;

pub use observer::ObserverLocation;
pub use transform::{
    ecef_to_enu, ecef_to_geodetic, gmst, subpoint, teme_to_ecef_position, topocentric,
    GeodeticPosition, TopocentricObservation, WGS84_A_KM, WGS84_E2, WGS84_F,
};
