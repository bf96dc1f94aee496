mod error;
mod sampler;
mod types;

pub use error::TrackError;
pub use sampler::{sample, GroundTrack, TRACK_PALETTE};
pub use types::GroundTrackPoint;

pub const DEFAULT_DURATION_MINUTES: u32 = 90;
pub const DEFAULT_INTERVAL_MINUTES: u32 = 5;
