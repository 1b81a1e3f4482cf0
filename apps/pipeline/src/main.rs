mod batch;
mod config;
mod errors;
mod layout;
mod llm_client;
mod render;
mod search;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::batch::Batch;
use crate::config::Config;
use crate::layout::typeface::TrueTypeFont;
use crate::llm_client::gemini::GeminiClient;
use crate::llm_client::QuoteClient;
use crate::render::HttpImageFetcher;
use crate::search::pexels::PexelsClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (aborts on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting quote pipeline v{}", env!("CARGO_PKG_VERSION"));

    // Font is loaded once and shared read-only across all item pipelines
    let face = Arc::new(TrueTypeFont::load(&config.font_path, config.font_size_px)?);
    info!(
        "Font loaded from {} at {}px",
        config.font_path.display(),
        config.font_size_px
    );

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            config.output_dir.display()
        )
    })?;

    // Initialize service clients
    let generator = Arc::new(GeminiClient::new(config.gemini_api_key.clone()));
    let quotes = Arc::new(QuoteClient::new(generator));
    info!(
        "Generation client initialized (model: {})",
        llm_client::gemini::MODEL
    );

    let search = Arc::new(PexelsClient::new(config.pexels_api_key.clone()));
    let fetcher = Arc::new(HttpImageFetcher::new());

    let batch = Batch {
        search,
        quotes,
        fetcher,
        face,
        query: config.search_query.clone(),
        per_page: config.photos_per_run,
        output_dir: config.output_dir.clone(),
        max_in_flight: config.max_in_flight,
    };

    batch.run().await;

    Ok(())
}
