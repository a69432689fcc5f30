//! INI configuration.
//!
//! ```ini
//! [SECRET]
//! kakao = <REST API key>
//!
//! [CRAWL]
//! category_id = 58635
//! max_page = 38
//! output = data
//! ```

use std::path::Path;

use anyhow::Result;
use ::config::{Config, File, FileFormat};
use serde::Deserialize;

use crate::scrapers::record::EXPECTED_FIELDS;

pub const DEFAULT_CONFIG_PATH: &str = "config.ini";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(rename = "SECRET", alias = "secret", default)]
    pub secret: Secret,
    #[serde(rename = "CRAWL", alias = "crawl", default)]
    pub crawl: CrawlSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secret {
    /// Kakao REST API key for address search
    pub kakao: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlSettings {
    pub category_id: u32,
    /// Exclusive upper bound on listing pages
    pub max_page: u32,
    /// Output file name without the `.json` extension
    pub output: String,
    pub expected_fields: usize,
    /// Re-geocode an existing output file instead of crawling
    pub reprocess: bool,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            category_id: 58635,
            max_page: 38,
            output: "data".to_string(),
            expected_fields: EXPECTED_FIELDS,
            reprocess: false,
        }
    }
}

impl Settings {
    /// Reads an INI file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(
                File::from(path)
                    .format(FileFormat::Ini)
                    .required(false),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Geocoding key, ignoring blank values
    pub fn kakao_key(&self) -> Option<&str> {
        self.secret
            .kakao
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
