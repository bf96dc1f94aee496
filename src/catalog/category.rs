use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

/// Element-set groups the catalog knows how to fetch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Stations,
    Weather,
    Noaa,
    Goes,
    Active,
    Geo,
}

impl Category {
    /// Lookup order for catalog ids present in more than one category.
    pub const ALL: [Category; 6] = [
        Category::Stations,
        Category::Weather,
        Category::Noaa,
        Category::Goes,
        Category::Active,
        Category::Geo,
    ];

    /// Parses a free-text key. Unknown keys map to `Active`.
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "stations" => Category::Stations,
            "weather" => Category::Weather,
            "noaa" => Category::Noaa,
            "goes" => Category::Goes,
            "geo" => Category::Geo,
            "active" => Category::Active,
            other => {
                log::debug!("Unknown category {:?}, using active", other);
                Category::Active
            }
        }
    }

    /// Upstream group name.
    pub fn group(&self) -> &'static str {
        match self {
            Category::Stations => "STATIONS",
            Category::Weather => "WEATHER",
            Category::Noaa => "NOAA",
            Category::Goes => "GOES",
            Category::Active => "ACTIVE",
            Category::Geo => "GEO",
        }
    }
}
