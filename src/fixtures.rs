//! Element sets and fakes shared by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::catalog::{CatalogManager, Category, ElementSource, FetchError};
use crate::orbit::OrbitModel;

pub const ISS_LINE1: &str =
    "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
pub const ISS_LINE2: &str =
    "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

/// Circular low orbit, epoch 2024-01-01 12:00 UTC.
pub const LEO_LINE1: &str =
    "1 90001U 24001A   24001.50000000  .00001000  00000-0  18000-4 0  9993";
pub const LEO_LINE2: &str =
    "2 90001  51.6400 120.0000 0005000  90.0000 270.0000 15.50000000 10006";

/// Same orbit with an absurd drag term; SGP4 diverges years after epoch.
pub const DECAY_LINE1: &str =
    "1 90002U 24001A   24001.50000000  .00100000  00000-0  50000-0 0  9996";
pub const DECAY_LINE2: &str =
    "2 90002  51.6400 200.0000 0005000  90.0000  10.0000 15.50000000 10008";

pub const STATIONS_FEED: &str = "ISS (ZARYA)
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
TEST LEO
1 90001U 24001A   24001.50000000  .00001000  00000-0  18000-4 0  9993
2 90001  51.6400 120.0000 0005000  90.0000 270.0000 15.50000000 10006
TEST DECAY
1 90002U 24001A   24001.50000000  .00100000  00000-0  50000-0 0  9996
2 90002  51.6400 200.0000 0005000  90.0000  10.0000 15.50000000 10008
";

/// Nine valid geostationary sets followed by one with a corrupted checksum.
pub const GEO_FEED: &str = "GEO-SAT 1
1 91001U 24001A   24001.50000000 -.00000100  00000-0  00000+0 0  9991
2 91001   0.0500  10.0000 0002000  90.0000 270.0000  1.00270000 10000
GEO-SAT 2
1 91002U 24001A   24001.50000000 -.00000100  00000-0  00000+0 0  9992
2 91002   0.0500  40.0000 0002000  90.0000 306.0000  1.00270000 10015
GEO-SAT 3
1 91003U 24001A   24001.50000000 -.00000100  00000-0  00000+0 0  9993
2 91003   0.0500  70.0000 0002000  90.0000 342.0000  1.00270000 10020
GEO-SAT 4
1 91004U 24001A   24001.50000000 -.00000100  00000-0  00000+0 0  9994
2 91004   0.0500 100.0000 0002000  90.0000  18.0000  1.00270000 10036
GEO-SAT 5
1 91005U 24001A   24001.50000000 -.00000100  00000-0  00000+0 0  9995
2 91005   0.0500 130.0000 0002000  90.0000  54.0000  1.00270000 10041
GEO-SAT 6
1 91006U 24001A   24001.50000000 -.00000100  00000-0  00000+0 0  9996
2 91006   0.0500 160.0000 0002000  90.0000  90.0000  1.00270000 10056
GEO-SAT 7
1 91007U 24001A   24001.50000000 -.00000100  00000-0  00000+0 0  9997
2 91007   0.0500 190.0000 0002000  90.0000 126.0000  1.00270000 10061
GEO-SAT 8
1 91008U 24001A   24001.50000000 -.00000100  00000-0  00000+0 0  9998
2 91008   0.0500 220.0000 0002000  90.0000 162.0000  1.00270000 10077
GEO-SAT 9
1 91009U 24001A   24001.50000000 -.00000100  00000-0  00000+0 0  9999
2 91009   0.0500 250.0000 0002000  90.0000 198.0000  1.00270000 10081
GEO-SAT 10
1 91010U 24001A   24001.50000000 -.00000100  00000-0  00000+0 0  9991
2 91010   0.0500 280.0000 0002000  90.0000 234.0000  1.00270000 10095
";

pub fn iss_model() -> OrbitModel {
    OrbitModel::create(ISS_LINE1, ISS_LINE2, "ISS (ZARYA)").unwrap()
}

pub fn leo_model() -> OrbitModel {
    OrbitModel::create(LEO_LINE1, LEO_LINE2, "TEST LEO").unwrap()
}

pub fn decaying_model() -> OrbitModel {
    OrbitModel::create(DECAY_LINE1, DECAY_LINE2, "TEST DECAY").unwrap()
}

/// In-memory element source with a call counter, optional latency and an
/// injectable failure.
#[derive(Default)]
pub struct StaticSource {
    feeds: Mutex<HashMap<Category, String>>,
    failure: Mutex<Option<FetchError>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(self, category: Category, feed: &str) -> Self {
        self.set_feed(category, feed);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_feed(&self, category: Category, feed: &str) {
        self.feeds.lock().unwrap().insert(category, feed.to_string());
    }

    pub fn set_failure(&self, failure: Option<FetchError>) {
        *self.failure.lock().unwrap() = failure;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ElementSource for StaticSource {
    async fn fetch(&self, category: Category) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(failure) = self.failure.lock().unwrap().clone() {
            return Err(failure);
        }
        self.feeds
            .lock()
            .unwrap()
            .get(&category)
            .cloned()
            .ok_or_else(|| FetchError::Io(format!("no feed for {}", category)))
    }

    fn describe(&self) -> String {
        "static".into()
    }
}

/// Catalog with the stations and geo feeds already refreshed.
pub async fn loaded_catalog() -> Arc<CatalogManager> {
    let source = StaticSource::new()
        .with_feed(Category::Stations, STATIONS_FEED)
        .with_feed(Category::Geo, GEO_FEED);
    let catalog = Arc::new(CatalogManager::new(Arc::new(source)));
    catalog.refresh(Category::Stations).await.unwrap();
    catalog.refresh(Category::Geo).await.unwrap();
    catalog
}
