use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::catalog::{CatalogManager, Category};

const MIN_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Background task that keeps a set of categories fresh.
pub struct CatalogRefresher {
    catalog: Arc<CatalogManager>,
    categories: Vec<Category>,
    check_interval: Duration,
}

impl CatalogRefresher {
    pub fn new(
        catalog: Arc<CatalogManager>,
        categories: Vec<Category>,
        check_interval: Duration,
    ) -> Self {
        // tokio's interval panics on a zero period
        let check_interval = if check_interval.is_zero() {
            log::warn!(
                "Refresh interval of zero, using {}",
                humantime::format_duration(MIN_CHECK_INTERVAL)
            );
            MIN_CHECK_INTERVAL
        } else {
            check_interval
        };
        Self {
            catalog,
            categories,
            check_interval,
        }
    }

    /// Checks every category once per interval, the first check immediately.
    pub fn start(self) -> JoinHandle<()> {
        log::info!(
            "Starting catalog refresher for {:?} (every {})",
            self.categories,
            humantime::format_duration(self.check_interval)
        );

        tokio::spawn(async move {
            let mut ticker = interval(self.check_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                self.run_once().await;
            }
        })
    }

    /// Refreshes whichever categories are stale. Returns how many were refreshed.
    pub async fn run_once(&self) -> usize {
        let mut refreshed = 0;
        for &category in &self.categories {
            match self.catalog.ensure_fresh(category).await {
                Ok(Some(report)) => {
                    refreshed += 1;
                    log::debug!("Scheduled refresh of {}: {} satellites", category, report.installed);
                }
                Ok(None) => {}
                Err(e) => log::warn!("Scheduled refresh of {} failed: {}", category, e),
            }
        }
        refreshed
    }
}
