use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::catalog::{Category, FetchError};

pub const CELESTRAK_GP_URL: &str = "https://celestrak.org/NORAD/elements/gp.php";

/// Supplies newline-delimited `name / line1 / line2` text for a category.
#[async_trait]
pub trait ElementSource: Send + Sync {
    async fn fetch(&self, category: Category) -> Result<String, FetchError>;

    fn describe(&self) -> String;
}

/// CelesTrak GP query endpoint in TLE format.
pub struct CelestrakSource {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl CelestrakSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        Self::with_builder(reqwest::Client::builder(), base_url, timeout)
    }

    fn with_builder(
        builder: reqwest::ClientBuilder,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = builder
            .timeout(timeout)
            .user_agent(concat!("sat-o-view/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
        })
    }

    fn request_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl ElementSource for CelestrakSource {
    async fn fetch(&self, category: Category) -> Result<String, FetchError> {
        log::debug!("Fetching {} from {}", category.group(), self.base_url);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("GROUP", category.group()), ("FORMAT", "tle")])
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        response.text().await.map_err(|e| self.request_error(e))
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Reads `<dir>/<category>.tle`, falling back to `<category>.txt`.
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl ElementSource for DirectorySource {
    async fn fetch(&self, category: Category) -> Result<String, FetchError> {
        if !self.dir.is_dir() {
            return Err(FetchError::Io(format!(
                "TLE directory not found: {}",
                self.dir.display()
            )));
        }

        for ext in ["tle", "txt"] {
            let path = self.dir.join(format!("{}.{}", category, ext));
            if path.is_file() {
                log::debug!("Reading {} from {}", category, path.display());
                return Ok(tokio::fs::read_to_string(&path).await?);
            }
        }

        Err(FetchError::Io(format!(
            "no element file for {} in {}",
            category,
            self.dir.display()
        )))
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}
