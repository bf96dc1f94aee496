use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::catalog::{CatalogEntry, CatalogManager};
use crate::error::ValidationError;
use crate::geo::subpoint;
use crate::orbit::OrbitError;
use crate::track::{GroundTrackPoint, TrackError};

/// Display colours handed out to tracks by name.
pub const TRACK_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Time-stepped ground positions for one satellite.
///
/// Nothing is propagated until the track is iterated, and every call to
/// [`GroundTrack::points`] starts again from the first step.
#[derive(Debug, Clone)]
pub struct GroundTrack {
    entry: Arc<CatalogEntry>,
    start: DateTime<Utc>,
    interval: Duration,
    steps: u32,
}

/// Builds the ground track of `catalog_id` from `start` over
/// `duration_minutes`, one point every `interval_minutes`.
pub fn sample(
    catalog: &CatalogManager,
    catalog_id: u32,
    start: DateTime<Utc>,
    duration_minutes: u32,
    interval_minutes: u32,
) -> Result<GroundTrack, TrackError> {
    ValidationError::check_range("duration", duration_minutes.into(), 1.0, 1440.0)?;
    ValidationError::check_range("interval", interval_minutes.into(), 1.0, 60.0)?;

    if catalog.is_empty() {
        return Err(TrackError::CatalogEmpty);
    }
    let entry = catalog
        .lookup(catalog_id)
        .ok_or(TrackError::NotFound(catalog_id))?;

    Ok(GroundTrack {
        entry,
        start,
        interval: Duration::minutes(interval_minutes.into()),
        steps: duration_minutes / interval_minutes + 1,
    })
}

impl GroundTrack {
    pub fn catalog_id(&self) -> u32 {
        self.entry.catalog_id()
    }

    pub fn name(&self) -> &str {
        self.entry.name()
    }

    /// Number of steps requested, including ones that fail to propagate.
    pub fn nominal_len(&self) -> usize {
        self.steps as usize
    }

    pub fn color(&self) -> &'static str {
        color_for(self.name())
    }

    /// Every step with its outcome. A step past the representable time range
    /// is an error like any other failed propagation.
    pub fn steps(&self) -> impl Iterator<Item = Result<GroundTrackPoint, OrbitError>> + '_ {
        (0..self.steps).map(move |i| {
            let timestamp = self
                .start
                .checked_add_signed(self.interval * i as i32)
                .ok_or_else(|| {
                    OrbitError::Propagation(format!(
                        "step {} from {} is out of the supported time range",
                        i, self.start
                    ))
                })?;
            self.point_at(timestamp)
        })
    }

    /// Points in time order; steps that fail to propagate are left out.
    pub fn points(&self) -> impl Iterator<Item = GroundTrackPoint> + '_ {
        self.steps().filter_map(|point| match point {
            Ok(point) => Some(point),
            Err(e) => {
                log::warn!("Ground track gap for {}: {}", self.catalog_id(), e);
                None
            }
        })
    }

    fn point_at(&self, timestamp: DateTime<Utc>) -> Result<GroundTrackPoint, OrbitError> {
        let eci = self.entry.model.position_at(timestamp)?;
        let sub = subpoint(&eci, timestamp);
        Ok(GroundTrackPoint {
            timestamp,
            latitude: sub.latitude_deg,
            longitude: sub.longitude_deg,
            altitude_km: sub.altitude_km,
        })
    }
}

fn color_for(name: &str) -> &'static str {
    let sum = name.chars().fold(0usize, |acc, c| acc + c as usize);
    TRACK_PALETTE[sum % TRACK_PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::fixtures::{leo_model, loaded_catalog, StaticSource, DECAY_LINE1, DECAY_LINE2};
    use crate::geo::{gmst, teme_to_ecef_position, ObserverLocation};
    use crate::track::{DEFAULT_DURATION_MINUTES, DEFAULT_INTERVAL_MINUTES};

    #[tokio::test]
    async fn default_track_has_nineteen_increasing_points() {
        let catalog = loaded_catalog().await;
        let track = sample(
            &catalog,
            90001,
            leo_model().epoch(),
            DEFAULT_DURATION_MINUTES,
            DEFAULT_INTERVAL_MINUTES,
        )
        .unwrap();

        let points: Vec<_> = track.points().collect();
        assert_eq!(track.nominal_len(), 19);
        assert_eq!(points.len(), 19);
        assert_eq!(points[0].timestamp, leo_model().epoch());
        for pair in points.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::minutes(5));
        }
    }

    #[tokio::test]
    async fn point_count_follows_duration_and_interval() {
        let catalog = loaded_catalog().await;
        let start = leo_model().epoch();
        for (duration, interval, expected) in [(1, 1, 2), (10, 3, 4), (1440, 60, 25), (59, 60, 1)]
        {
            let track = sample(&catalog, 90001, start, duration, interval).unwrap();
            assert_eq!(track.nominal_len(), expected);
            assert_eq!(track.points().count(), expected);
        }
    }

    #[tokio::test]
    async fn points_are_restartable() {
        let catalog = loaded_catalog().await;
        let track = sample(&catalog, 90001, leo_model().epoch(), 30, 5).unwrap();
        let first: Vec<_> = track.points().collect();
        let second: Vec<_> = track.points().collect();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn altitudes_round_trip_through_ecef() {
        let catalog = loaded_catalog().await;
        let model = leo_model();
        let track = sample(&catalog, 90001, model.epoch(), 180, 2).unwrap();

        for point in track.points() {
            assert!(
                point.altitude_km > 300.0 && point.altitude_km < 550.0,
                "{}",
                point.altitude_km
            );
            assert!((-90.0..=90.0).contains(&point.latitude));
            assert!((-180.0..180.0).contains(&point.longitude));

            let eci = model.position_at(point.timestamp).unwrap();
            let expected = teme_to_ecef_position(eci.position_km, gmst(point.timestamp));
            let rebuilt = ObserverLocation::new(
                point.latitude,
                point.longitude,
                point.altitude_km * 1000.0,
            )
            .unwrap()
            .position_ecef_km();
            let error = ((rebuilt[0] - expected[0]).powi(2)
                + (rebuilt[1] - expected[1]).powi(2)
                + (rebuilt[2] - expected[2]).powi(2))
            .sqrt();
            assert!(error < 1.0, "round trip error {} km", error);
        }
    }

    #[tokio::test]
    async fn rejects_bounds_before_lookup() {
        let catalog = loaded_catalog().await;
        let start = Utc::now();
        for (duration, interval) in [(0, 5), (1441, 5), (90, 0), (90, 61)] {
            assert!(matches!(
                sample(&catalog, 424242, start, duration, interval),
                Err(TrackError::Validation(_))
            ));
        }
        assert_eq!(
            sample(&catalog, 424242, start, 90, 5).unwrap_err(),
            TrackError::NotFound(424242)
        );
    }

    #[tokio::test]
    async fn failed_steps_leave_gaps() {
        let feed = format!("TEST DECAY\n{}\n{}\n", DECAY_LINE1, DECAY_LINE2);
        let source = StaticSource::new().with_feed(Category::Stations, &feed);
        let catalog = CatalogManager::new(Arc::new(source));
        catalog.refresh(Category::Stations).await.unwrap();

        let start = leo_model().epoch() + Duration::days(365 * 20);
        let track = sample(&catalog, 90002, start, 90, 5).unwrap();
        assert_eq!(track.nominal_len(), 19);
        assert!(track.points().count() < track.nominal_len());
        assert!(track.steps().any(|point| point.is_err()));
    }

    #[tokio::test]
    async fn steps_past_the_end_of_time_are_gaps() {
        let catalog = loaded_catalog().await;
        let start = DateTime::<Utc>::MAX_UTC - Duration::minutes(30);
        let track = sample(&catalog, 90001, start, 90, 5).unwrap();

        assert_eq!(track.nominal_len(), 19);
        let failed = track.steps().filter(|point| point.is_err()).count();
        assert!(failed >= 12, "{} failed steps", failed);
        assert!(track.points().count() <= 7);
    }

    #[tokio::test]
    async fn never_refreshed_catalog_is_not_a_miss() {
        let catalog = CatalogManager::new(Arc::new(StaticSource::new()));
        assert_eq!(
            sample(&catalog, 25544, Utc::now(), 90, 5).unwrap_err(),
            TrackError::CatalogEmpty
        );
        // bounds are still checked first
        assert!(matches!(
            sample(&catalog, 25544, Utc::now(), 0, 5),
            Err(TrackError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn color_is_stable_per_name() {
        let catalog = loaded_catalog().await;
        let a = sample(&catalog, 90001, Utc::now(), 90, 5).unwrap();
        let b = sample(&catalog, 90001, Utc::now(), 10, 1).unwrap();
        assert_eq!(a.color(), b.color());
        assert_eq!(a.color(), "#e377c2");
        assert!(TRACK_PALETTE.contains(&color_for("ISS (ZARYA)")));
    }
}
