use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::{CrawlSettings, Settings};
use crate::crawler::Crawler;
use crate::geocoder::KakaoGeocoder;
use crate::scrapers::record;
use crate::store::Store;
use crate::traits::{Geocoder, SiteConfig};

pub struct SoolFinder {
    crawler: Crawler,
    store: Store,
    crawl: CrawlSettings,
}

impl SoolFinder {
    pub fn new(settings: Settings) -> Result<Self> {
        Self::with_site(settings, SiteConfig::naver_terms())
    }

    pub fn with_site(settings: Settings, site: SiteConfig) -> Result<Self> {
        let geocoder = settings
            .kakao_key()
            .map(|key| Arc::new(KakaoGeocoder::new(key)) as Arc<dyn Geocoder>);

        if geocoder.is_none() {
            warn!("[SECRET] kakao not set - addresses will be stored as plain text");
        }

        Self::with_parts(settings.crawl, site, geocoder)
    }

    pub fn with_parts(
        crawl: CrawlSettings,
        site: SiteConfig,
        geocoder: Option<Arc<dyn Geocoder>>,
    ) -> Result<Self> {
        let crawler = Crawler::new(site, geocoder, crawl.expected_fields)?;
        let store = Store::new(&crawl.output);

        Ok(Self {
            crawler,
            store,
            crawl,
        })
    }

    pub async fn run(&self) -> Result<()> {
        info!("Output file: {}", self.store.path().display());

        if self.crawl.reprocess {
            self.reprocess().await
        } else {
            self.crawl_and_save().await
        }
    }

    pub async fn crawl_and_save(&self) -> Result<()> {
        let liquors = self
            .crawler
            .crawl_category(self.crawl.category_id, self.crawl.max_page)
            .await?;

        self.store.save(&liquors)
    }

    /// Reloads the saved file and geocodes legacy plain-text addresses.
    /// Entries whose address cannot be resolved are dropped.
    pub async fn reprocess(&self) -> Result<()> {
        let Some(geocoder) = self.crawler.geocoder() else {
            return Err(anyhow::anyhow!(
                "Reprocessing needs a geocoding key in [SECRET] kakao"
            ));
        };

        let loaded = self.store.load()?;
        let total = loaded.len();
        let mut kept = Vec::with_capacity(total);

        for liquor in loaded {
            let name = liquor.name.clone();
            match record::regeocode(liquor, geocoder).await {
                Ok(liquor) => kept.push(liquor),
                Err(reason) => warn!(name = %name, %reason, "Entry dropped"),
            }
        }

        info!("Reprocessed {} entries, kept {}", total, kept.len());
        self.store.save(&kept)
    }
}
