use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::catalog::{
    CatalogManager, Category, CelestrakSource, DirectorySource, ElementSource, FetchError,
    CELESTRAK_GP_URL, DEFAULT_FETCH_TIMEOUT, DEFAULT_STALE_AFTER,
};
use crate::error::ValidationError;
use crate::geo::ObserverLocation;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    /// Used when a query does not name its own location.
    pub observer: Option<ObserverConfig>,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObserverConfig {
    pub coordinates: String,
    #[serde(default)]
    pub altitude_m: f64,
}

impl ObserverConfig {
    pub fn location(&self) -> Result<ObserverLocation, ValidationError> {
        ObserverLocation::from_coordinates(&self.coordinates, Some(self.altitude_m))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default = "default_fetch_timeout", deserialize_with = "deserialize_duration")]
    pub fetch_timeout: Duration,
    #[serde(default = "default_stale_after", deserialize_with = "deserialize_duration")]
    pub stale_after: Duration,
    #[serde(
        default = "default_refresh_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub refresh_interval: Duration,
    /// Refreshed at startup and kept fresh while serving.
    #[serde(default = "default_preload")]
    pub preload: Vec<Category>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            fetch_timeout: default_fetch_timeout(),
            stale_after: default_stale_after(),
            refresh_interval: default_refresh_interval(),
            preload: default_preload(),
        }
    }
}

impl CatalogConfig {
    pub fn build_source(&self) -> Result<Arc<dyn ElementSource>, FetchError> {
        Ok(match &self.source {
            SourceConfig::Celestrak { base_url } => {
                Arc::new(CelestrakSource::new(base_url.clone(), self.fetch_timeout)?)
            }
            SourceConfig::Directory { path } => Arc::new(DirectorySource::new(path.clone())),
        })
    }

    pub fn build_catalog(&self) -> Result<CatalogManager, FetchError> {
        Ok(CatalogManager::new(self.build_source()?)
            .with_fetch_timeout(self.fetch_timeout)
            .with_stale_after(self.stale_after))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Celestrak {
        #[serde(default = "default_base_url")]
        base_url: String,
    },
    /// One `<category>.tle` file per category.
    Directory { path: PathBuf },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Celestrak {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    CELESTRAK_GP_URL.to_string()
}

fn default_fetch_timeout() -> Duration {
    DEFAULT_FETCH_TIMEOUT
}

fn default_stale_after() -> Duration {
    DEFAULT_STALE_AFTER
}

fn default_refresh_interval() -> Duration {
    Duration::from_secs(5 * 60)
}

fn default_preload() -> Vec<Category> {
    vec![Category::Stations]
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let duration = humantime::parse_duration(&s).map_err(serde::de::Error::custom)?;
    if duration.is_zero() {
        return Err(serde::de::Error::custom(format!(
            "duration must be greater than zero, got {:?}",
            s
        )));
    }
    Ok(duration)
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Configured observer, if any and valid.
    pub fn default_observer(&self) -> Option<ObserverLocation> {
        let observer = self.observer.as_ref()?;
        match observer.location() {
            Ok(location) => Some(location),
            Err(e) => {
                log::warn!("Ignoring configured observer: {}", e);
                None
            }
        }
    }
}
