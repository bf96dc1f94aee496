mod elements;
mod error;
mod model;

pub use elements::{checksum, validate_lines, OrbitalElementSet};
pub use error::OrbitError;
pub use model::{EciVector, OrbitModel};
