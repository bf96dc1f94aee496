use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sgp4::{Constants, Elements};
use utoipa::ToSchema;

use crate::orbit::elements::validate_lines;
use crate::orbit::{OrbitError, OrbitalElementSet};

const MINUTES_PER_DAY: f64 = 1440.0;

/// Position and velocity in the TEME (Earth-centered inertial) frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct EciVector {
    pub timestamp: DateTime<Utc>,
    pub position_km: [f64; 3],
    pub velocity_km_s: [f64; 3],
}

impl EciVector {
    pub fn radius_km(&self) -> f64 {
        let [x, y, z] = self.position_km;
        (x * x + y * y + z * z).sqrt()
    }
}

/// SGP4 model built from a single element set.
#[derive(Debug, Clone)]
pub struct OrbitModel {
    element_set: OrbitalElementSet,
    elements: Elements,
    constants: Constants,
}

impl OrbitModel {
    /// Parses and validates a two-line element pair.
    pub fn create(line1: &str, line2: &str, name: &str) -> Result<Self, OrbitError> {
        let line1 = line1.trim();
        let line2 = line2.trim();
        let catalog_id = validate_lines(line1, line2)?;

        let name = name.trim();
        let object_name = (!name.is_empty()).then(|| name.to_string());
        let elements = Elements::from_tle(object_name, line1.as_bytes(), line2.as_bytes())?;
        let constants = Constants::from_elements(&elements)?;

        let name = elements
            .object_name
            .clone()
            .unwrap_or_else(|| format!("NORAD {}", catalog_id));

        Ok(Self {
            element_set: OrbitalElementSet {
                catalog_id,
                name,
                line1: line1.to_string(),
                line2: line2.to_string(),
                epoch: elements.datetime.and_utc(),
            },
            elements,
            constants,
        })
    }

    pub fn element_set(&self) -> &OrbitalElementSet {
        &self.element_set
    }

    pub fn catalog_id(&self) -> u32 {
        self.element_set.catalog_id
    }

    pub fn name(&self) -> &str {
        &self.element_set.name
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.element_set.epoch
    }

    /// Nodal period derived from the mean motion (revolutions per day).
    pub fn orbital_period(&self) -> Duration {
        let minutes = MINUTES_PER_DAY / self.elements.mean_motion;
        Duration::milliseconds((minutes * 60_000.0).round() as i64)
    }

    /// Propagates the element set to `time`.
    pub fn position_at(&self, time: DateTime<Utc>) -> Result<EciVector, OrbitError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&time.naive_utc())
            .map_err(|e| OrbitError::Propagation(e.to_string()))?;

        let prediction = self.constants.propagate(minutes)?;

        let finite = prediction
            .position
            .iter()
            .chain(prediction.velocity.iter())
            .all(|v| v.is_finite());
        if !finite {
            return Err(OrbitError::Propagation(format!(
                "non-finite state for {} at {}",
                self.catalog_id(),
                time
            )));
        }

        Ok(EciVector {
            timestamp: time,
            position_km: prediction.position,
            velocity_km_s: prediction.velocity,
        })
    }
}
