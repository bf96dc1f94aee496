use std::cmp::Ordering;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;

use crate::cancel::CancelToken;
use crate::catalog::{CatalogEntry, CatalogSnapshot};
use crate::error::ValidationError;
use crate::geo::{subpoint, topocentric};
use crate::orbit::OrbitError;
use crate::visibility::{
    SkippedSatellite, VisibilityError, VisibilityQuery, VisibilityReport, VisibleSatelliteRecord,
};

/// Batches smaller than this are evaluated on the calling thread.
const PARALLEL_THRESHOLD: usize = 64;

enum Outcome {
    Visible(VisibleSatelliteRecord),
    Below,
    Skipped(SkippedSatellite),
}

/// Evaluates every satellite in `snapshot` for one observer and instant.
///
/// Satellites that fail to propagate are reported in `skipped` and never
/// fail the query. Results are ordered by elevation, highest first, with
/// ties broken by ascending catalog id.
pub fn find_visible(
    snapshot: &CatalogSnapshot,
    query: &VisibilityQuery,
    cancel: &CancelToken,
) -> Result<VisibilityReport, VisibilityError> {
    query.observer.validate()?;
    ValidationError::check_range("min_elevation", query.min_elevation_deg, -90.0, 90.0)?;
    if query.limit == Some(0) {
        return Err(ValidationError::Invalid("limit must be at least 1".into()).into());
    }

    let outcomes = evaluate_all(snapshot.entries(), query, cancel);
    if cancel.is_cancelled() {
        log::debug!("Visibility query cancelled after {} satellites", outcomes.len());
        return Err(VisibilityError::Cancelled);
    }

    let mut visible = Vec::new();
    let mut skipped = Vec::new();
    for outcome in outcomes {
        match outcome {
            Outcome::Visible(record) => visible.push(record),
            Outcome::Skipped(skip) => skipped.push(skip),
            Outcome::Below => {}
        }
    }

    if !skipped.is_empty() {
        log::warn!(
            "{} of {} satellites could not be propagated to {}",
            skipped.len(),
            snapshot.len(),
            query.at
        );
    }

    Ok(VisibilityReport {
        timestamp: query.at,
        observer: query.observer,
        min_elevation_deg: query.min_elevation_deg,
        evaluated: snapshot.len(),
        satellites: rank(visible, query.limit),
        skipped,
    })
}

fn evaluate_all(
    entries: &[Arc<CatalogEntry>],
    query: &VisibilityQuery,
    cancel: &CancelToken,
) -> Vec<Outcome> {
    let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    if entries.len() < PARALLEL_THRESHOLD || workers == 1 {
        return evaluate_chunk(entries, query, cancel);
    }

    let chunk_size = entries.len().div_ceil(workers);
    thread::scope(|scope| {
        let handles: Vec<_> = entries
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move || evaluate_chunk(chunk, query, cancel)))
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    })
}

fn evaluate_chunk(
    entries: &[Arc<CatalogEntry>],
    query: &VisibilityQuery,
    cancel: &CancelToken,
) -> Vec<Outcome> {
    let mut outcomes = Vec::with_capacity(entries.len());
    for entry in entries {
        if cancel.is_cancelled() {
            break;
        }
        let outcome = match observe(entry, query) {
            Ok(Some(record)) => Outcome::Visible(record),
            Ok(None) => Outcome::Below,
            Err(e) => {
                log::debug!("Skipping {} ({}): {}", entry.name(), entry.catalog_id(), e);
                Outcome::Skipped(SkippedSatellite {
                    catalog_id: entry.catalog_id(),
                    name: entry.name().to_string(),
                    reason: e.to_string(),
                })
            }
        };
        outcomes.push(outcome);
    }
    outcomes
}

fn observe(
    entry: &CatalogEntry,
    query: &VisibilityQuery,
) -> Result<Option<VisibleSatelliteRecord>, OrbitError> {
    let eci = entry.model.position_at(query.at)?;
    let look = topocentric(&eci, &query.observer, query.at);
    if look.elevation_deg < query.min_elevation_deg {
        return Ok(None);
    }

    let sub = subpoint(&eci, query.at);
    Ok(Some(VisibleSatelliteRecord {
        catalog_id: entry.catalog_id(),
        name: entry.name().to_string(),
        elevation_deg: look.elevation_deg,
        azimuth_deg: look.azimuth_deg,
        range_km: look.range_km,
        sub_latitude: sub.latitude_deg,
        sub_longitude: sub.longitude_deg,
        altitude_km: sub.altitude_km,
    }))
}

fn by_elevation(a: &VisibleSatelliteRecord, b: &VisibleSatelliteRecord) -> Ordering {
    b.elevation_deg
        .total_cmp(&a.elevation_deg)
        .then(a.catalog_id.cmp(&b.catalog_id))
}

/// Sorts, selecting the top `limit` first so only the kept records are sorted.
fn rank(
    mut records: Vec<VisibleSatelliteRecord>,
    limit: Option<usize>,
) -> Vec<VisibleSatelliteRecord> {
    if let Some(k) = limit.filter(|&k| k > 0 && k < records.len()) {
        records.select_nth_unstable_by(k - 1, by_elevation);
        records.truncate(k);
    }
    records.sort_by(by_elevation);
    records
}
