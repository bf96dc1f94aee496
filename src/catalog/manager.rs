use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use utoipa::ToSchema;

use crate::catalog::parser::{parse_element_feed, SkippedTriplet};
use crate::catalog::{CatalogError, Category, ElementSource, FetchError};
use crate::orbit::{OrbitModel, OrbitalElementSet};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(60 * 60);

#[derive(Debug)]
pub struct CatalogEntry {
    pub model: OrbitModel,
    pub category: Category,
    pub last_refreshed: DateTime<Utc>,
}

impl CatalogEntry {
    pub fn catalog_id(&self) -> u32 {
        self.model.catalog_id()
    }

    pub fn name(&self) -> &str {
        self.model.name()
    }

    pub fn element_set(&self) -> &OrbitalElementSet {
        self.model.element_set()
    }

    pub fn summary(&self) -> SatelliteSummary {
        let set = self.element_set();
        SatelliteSummary {
            catalog_id: set.catalog_id,
            name: set.name.clone(),
            category: self.category,
            line1: set.line1.clone(),
            line2: set.line2.clone(),
            epoch: set.epoch,
            last_refreshed: self.last_refreshed,
        }
    }
}

/// Metadata listing unit.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SatelliteSummary {
    pub catalog_id: u32,
    pub name: String,
    pub category: Category,
    pub line1: String,
    pub line2: String,
    pub epoch: DateTime<Utc>,
    pub last_refreshed: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RefreshReport {
    pub category: Category,
    pub installed: usize,
    pub skipped: Vec<SkippedTriplet>,
    pub refreshed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryStatus {
    pub category: Category,
    pub count: usize,
    pub last_refreshed: Option<DateTime<Utc>>,
    pub stale: bool,
}

/// Entries of one category as installed by a single refresh.
#[derive(Debug)]
struct CategorySnapshot {
    entries: Vec<Arc<CatalogEntry>>,
    index: HashMap<u32, usize>,
    refreshed_at: DateTime<Utc>,
}

impl CategorySnapshot {
    fn get(&self, catalog_id: u32) -> Option<&Arc<CatalogEntry>> {
        self.index.get(&catalog_id).map(|&i| &self.entries[i])
    }
}

/// Serializes refreshes of one category. `generation` moves once per
/// completed refresh so a waiter can tell that the work it queued for has
/// already been done.
#[derive(Default)]
struct RefreshSlot {
    last: Mutex<Option<Result<RefreshReport, CatalogError>>>,
    generation: AtomicU64,
}

/// Point-in-time view over one or all categories.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    entries: Vec<Arc<CatalogEntry>>,
}

impl CatalogSnapshot {
    pub fn from_entries(entries: Vec<Arc<CatalogEntry>>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Arc<CatalogEntry>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Owns the satellite catalog. Readers work on `Arc` snapshots; a refresh
/// builds a complete category off to the side and swaps it in at once.
pub struct CatalogManager {
    source: Arc<dyn ElementSource>,
    fetch_timeout: Duration,
    stale_after: Duration,
    snapshots: RwLock<HashMap<Category, Arc<CategorySnapshot>>>,
    slots: HashMap<Category, RefreshSlot>,
}

impl CatalogManager {
    pub fn new(source: Arc<dyn ElementSource>) -> Self {
        Self {
            source,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            stale_after: DEFAULT_STALE_AFTER,
            snapshots: RwLock::new(HashMap::new()),
            slots: Category::ALL
                .into_iter()
                .map(|c| (c, RefreshSlot::default()))
                .collect(),
        }
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    /// Fetches `category` and replaces its entries wholesale.
    ///
    /// On failure the previous entries stay in place. A caller that had to
    /// wait for a concurrent refresh of the same category gets that refresh's
    /// outcome instead of fetching again.
    pub async fn refresh(&self, category: Category) -> Result<RefreshReport, CatalogError> {
        let slot = &self.slots[&category];
        let observed = slot.generation.load(Ordering::Acquire);

        let mut last = slot.last.lock().await;
        if slot.generation.load(Ordering::Acquire) != observed {
            if let Some(outcome) = last.as_ref() {
                log::debug!("Reusing concurrent refresh of {}", category);
                return outcome.clone();
            }
        }

        let outcome = self.fetch_and_install(category).await;
        if let Err(e) = &outcome {
            log::error!("Refresh of {} failed: {}", category, e);
        }

        *last = Some(outcome.clone());
        slot.generation.fetch_add(1, Ordering::Release);
        outcome
    }

    async fn fetch_and_install(&self, category: Category) -> Result<RefreshReport, CatalogError> {
        let started = Instant::now();

        let text = tokio::time::timeout(self.fetch_timeout, self.source.fetch(category))
            .await
            .map_err(|_| FetchError::Timeout(self.fetch_timeout))??;

        let feed = parse_element_feed(&text);
        if feed.models.is_empty() {
            return Err(FetchError::Empty {
                category,
                skipped: feed.skipped.len(),
            }
            .into());
        }

        let refreshed_at = Utc::now();
        let entries: Vec<Arc<CatalogEntry>> = feed
            .models
            .into_iter()
            .map(|model| {
                Arc::new(CatalogEntry {
                    model,
                    category,
                    last_refreshed: refreshed_at,
                })
            })
            .collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.catalog_id(), i))
            .collect();
        let installed = entries.len();

        let snapshot = Arc::new(CategorySnapshot {
            entries,
            index,
            refreshed_at,
        });
        self.snapshots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(category, snapshot);

        log::info!(
            "Refreshed {} from {}: {} satellites, {} skipped in {:?}",
            category,
            self.source.describe(),
            installed,
            feed.skipped.len(),
            started.elapsed()
        );

        Ok(RefreshReport {
            category,
            installed,
            skipped: feed.skipped,
            refreshed_at,
        })
    }

    /// Refreshes `category` only if it is stale. This is the only read-side
    /// entry point that performs I/O.
    pub async fn ensure_fresh(
        &self,
        category: Category,
    ) -> Result<Option<RefreshReport>, CatalogError> {
        if self.is_stale(category) {
            self.refresh(category).await.map(Some)
        } else {
            Ok(None)
        }
    }

    /// Never-refreshed categories are stale. Checking does not fetch.
    pub fn is_stale(&self, category: Category) -> bool {
        match self.category_snapshot(category) {
            Some(snapshot) => self.is_expired(snapshot.refreshed_at),
            None => true,
        }
    }

    fn is_expired(&self, refreshed_at: DateTime<Utc>) -> bool {
        let age = (Utc::now() - refreshed_at).to_std().unwrap_or_default();
        age >= self.stale_after
    }

    /// True until the first successful refresh of any category.
    pub fn is_empty(&self) -> bool {
        self.read_snapshots().is_empty()
    }

    pub fn is_loaded(&self, category: Category) -> bool {
        self.category_snapshot(category).is_some()
    }

    pub fn last_refreshed(&self, category: Category) -> Option<DateTime<Utc>> {
        self.category_snapshot(category).map(|s| s.refreshed_at)
    }

    /// First match in `Category::ALL` order.
    pub fn lookup(&self, catalog_id: u32) -> Option<Arc<CatalogEntry>> {
        let snapshots = self.read_snapshots();
        Category::ALL
            .iter()
            .filter_map(|c| snapshots.get(c))
            .find_map(|s| s.get(catalog_id).cloned())
    }

    /// Entries of one category in feed order.
    pub fn list_by_category(&self, category: Category) -> Vec<Arc<CatalogEntry>> {
        self.category_snapshot(category)
            .map(|s| s.entries.clone())
            .unwrap_or_default()
    }

    /// Entries visible to a query. With no category, every loaded category
    /// is included and ids present in several categories appear once.
    pub fn snapshot(&self, category: Option<Category>) -> Result<CatalogSnapshot, CatalogError> {
        let snapshots = self.read_snapshots();
        if snapshots.is_empty() {
            return Err(CatalogError::Empty);
        }

        let entries = match category {
            Some(c) => snapshots
                .get(&c)
                .ok_or(CatalogError::NotLoaded(c))?
                .entries
                .clone(),
            None => {
                let mut seen = HashSet::new();
                Category::ALL
                    .iter()
                    .filter_map(|c| snapshots.get(c))
                    .flat_map(|s| s.entries.iter())
                    .filter(|e| seen.insert(e.catalog_id()))
                    .cloned()
                    .collect()
            }
        };

        Ok(CatalogSnapshot { entries })
    }

    pub fn status(&self) -> Vec<CategoryStatus> {
        Category::ALL
            .into_iter()
            .map(|category| {
                let snapshot = self.category_snapshot(category);
                CategoryStatus {
                    category,
                    count: snapshot.as_ref().map_or(0, |s| s.entries.len()),
                    last_refreshed: snapshot.as_ref().map(|s| s.refreshed_at),
                    stale: snapshot.map_or(true, |s| self.is_expired(s.refreshed_at)),
                }
            })
            .collect()
    }

    fn category_snapshot(&self, category: Category) -> Option<Arc<CategorySnapshot>> {
        self.read_snapshots().get(&category).cloned()
    }

    fn read_snapshots(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<Category, Arc<CategorySnapshot>>> {
        self.snapshots.read().unwrap_or_else(PoisonError::into_inner)
    }
}
