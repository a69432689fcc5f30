use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::models::Liquor;
use crate::scrapers::naver_terms::{self, PageSelectors};
use crate::scrapers::record::{self, DetailOutcome};
use crate::traits::{Geocoder, SiteConfig};

/// Sequential listing/detail crawler for one encyclopedia category
pub struct Crawler {
    client: Client,
    site: SiteConfig,
    selectors: PageSelectors,
    geocoder: Option<Arc<dyn Geocoder>>,
    expected_fields: usize,
}

impl Crawler {
    pub fn new(
        site: SiteConfig,
        geocoder: Option<Arc<dyn Geocoder>>,
        expected_fields: usize,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36")
            .build()?;
        let selectors = PageSelectors::compile(&site.selectors)?;

        Ok(Self {
            client,
            site,
            selectors,
            geocoder,
            expected_fields,
        })
    }

    pub fn geocoder(&self) -> Option<&dyn Geocoder> {
        self.geocoder.as_deref()
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Failed to fetch {}: {}",
                url,
                response.status()
            ));
        }

        Ok(response.text().await?)
    }

    /// Fetches one detail page and builds its record.
    ///
    /// Network faults and an unrecognizable page layout are errors; every
    /// other problem is a [`DetailOutcome::Rejected`].
    pub async fn parse_detail(&self, url: &str) -> Result<DetailOutcome> {
        let html = self.fetch_html(url).await?;
        let page = naver_terms::extract_detail(&html, &self.selectors)
            .with_context(|| format!("Unexpected detail page layout at {url}"))?;

        Ok(record::assemble(page, self.geocoder(), self.expected_fields).await)
    }

    /// Visits listing pages `1..max_page` and collects every accepted record
    /// in page order, then in-page order.
    pub async fn crawl_category(&self, category_id: u32, max_page: u32) -> Result<Vec<Liquor>> {
        info!(
            "Crawling category {} on {} (pages 1..{})",
            category_id, self.site.name, max_page
        );

        let mut liquors = Vec::new();
        let mut rejected = 0;

        for page in 1..max_page {
            let list_url = self.site.build_list_url(category_id, page);
            let html = self.fetch_html(&list_url).await?;
            let links = naver_terms::extract_title_links(&html, &self.selectors);

            info!("Page {}: {} entries", page, links.len());

            for link in links {
                info!(page, title = %link.title, "Visiting entry");

                let url = self.site.resolve(&link.href);
                match self.parse_detail(&url).await? {
                    DetailOutcome::Accepted(liquor) => {
                        debug!(
                            name = %liquor.name,
                            category = liquor.category.as_str(),
                            "Entry accepted"
                        );
                        liquors.push(liquor);
                    }
                    DetailOutcome::Rejected(reason) => {
                        warn!(url = %url, title = %link.title, %reason, "Entry rejected");
                        rejected += 1;
                    }
                }
            }
        }

        info!(
            "Collected {} entries from category {} ({} rejected)",
            liquors.len(),
            category_id,
            rejected
        );
        Ok(liquors)
    }
}
