//! Site configuration and the geocoding interface

use async_trait::async_trait;

use crate::geocoder::GeocodeError;
use crate::models::Location;

/// Configuration for the encyclopedia being crawled
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Display name for the website
    pub name: String,
    /// Base URL that relative detail links are resolved against
    pub base_url: String,
    /// Listing URL pattern with {category} and {page} placeholders
    pub list_url_pattern: String,
    /// CSS selectors for extracting data
    pub selectors: SiteSelectors,
}

/// CSS selectors for listing and detail pages
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    /// Detail-page anchors on a listing page
    pub title_link: String,
    /// Rows of the profile table on a detail page
    pub profile_row: String,
    /// Label cell within a profile row
    pub row_label: String,
    /// Value cell within a profile row
    pub row_value: String,
    /// Thumbnail anchor whose href carries the full image URL
    pub thumbnail_link: String,
    /// Inline script holding the term source
    pub term_script: String,
}

impl SiteConfig {
    /// Naver terms "우리술 대백과" layout
    pub fn naver_terms() -> Self {
        Self::naver_terms_at("https://terms.naver.com")
    }

    /// Same layout served from another origin
    pub fn naver_terms_at(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();

        Self {
            name: "Naver terms".to_string(),
            list_url_pattern: format!(
                "{base_url}/list.naver?cid=42726&categoryId={{category}}&page={{page}}"
            ),
            base_url,
            selectors: SiteSelectors {
                title_link: "#content > div.list_wrap > ul > li > div.info_area > div.subject > strong > a:nth-child(1)".to_string(),
                profile_row: "#size_ct > div.att_type div.wr_tmp_profile > div > table > tbody > tr".to_string(),
                row_label: "th".to_string(),
                row_value: "td".to_string(),
                thumbnail_link: "#size_ct > div.att_type > div > div.thmb.thmb_border > span > a".to_string(),
                term_script: "#termBody > script:nth-child(5)".to_string(),
            },
        }
    }

    /// Listing URL for one page of a category
    pub fn build_list_url(&self, category_id: u32, page: u32) -> String {
        self.list_url_pattern
            .replace("{category}", &category_id.to_string())
            .replace("{page}", &page.to_string())
    }

    /// Resolves a listing href against the base URL
    pub fn resolve(&self, href: &str) -> String {
        if href.starts_with("http") {
            href.to_string()
        } else {
            format!("{}{}", self.base_url, href)
        }
    }
}

/// Turns a free-text address into coordinates and region names
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Look up an address
    ///
    /// # Returns
    /// * `Result<Location, GeocodeError>` - First match, or why there is none
    async fn geocode(&self, address: &str) -> Result<Location, GeocodeError>;
}
