use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod crawler;
mod geocoder;
mod models;
mod normalize;
mod scrapers;
mod sool_finder;
mod store;
mod traits;

use crate::config::{DEFAULT_CONFIG_PATH, Settings};
use sool_finder::SoolFinder;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("SOOL_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let settings = Settings::load(&config_path)?;

    info!("Starting traditional liquor crawler (config: {})", config_path);

    let finder = SoolFinder::new(settings)?;
    finder.run().await?;

    info!("Done");
    Ok(())
}
