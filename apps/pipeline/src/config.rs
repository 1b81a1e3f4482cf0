use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup aborts if required API keys are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub pexels_api_key: String,
    pub search_query: String,
    pub photos_per_run: u32,
    pub output_dir: PathBuf,
    pub font_path: PathBuf,
    pub font_size_px: f32,
    pub max_in_flight: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            pexels_api_key: require_env("PEXELS_API_KEY")?,
            search_query: std::env::var("SEARCH_QUERY").unwrap_or_else(|_| "space".to_string()),
            photos_per_run: std::env::var("PHOTOS_PER_RUN")
                .unwrap_or_else(|_| "50".to_string())
                .parse::<u32>()
                .context("PHOTOS_PER_RUN must be a positive number")?,
            output_dir: std::env::var("OUTPUT_DIR")
                .unwrap_or_else(|_| "./images".to_string())
                .into(),
            font_path: std::env::var("FONT_PATH")
                .unwrap_or_else(|_| "./assets/Lobster-Regular.ttf".to_string())
                .into(),
            font_size_px: std::env::var("FONT_SIZE_PX")
                .unwrap_or_else(|_| "64".to_string())
                .parse::<f32>()
                .context("FONT_SIZE_PX must be a number")?,
            max_in_flight: std::env::var("MAX_IN_FLIGHT")
                .unwrap_or_else(|_| "8".to_string())
                .parse::<usize>()
                .context("MAX_IN_FLIGHT must be a positive number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
