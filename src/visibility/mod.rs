mod engine;
mod error;
mod types;

pub use engine::find_visible;
pub use error::VisibilityError;
pub use types::{SkippedSatellite, VisibilityQuery, VisibilityReport, VisibleSatelliteRecord};

pub const DEFAULT_MIN_ELEVATION_DEG: f64 = 10.0;
