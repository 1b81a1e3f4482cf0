// Photo search — supplies the batch's input set.
// One call per run; failures abort the batch (logged, not retried).

use async_trait::async_trait;
use thiserror::Error;

pub mod pexels;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// One source photo returned by the search service.
#[derive(Debug, Clone)]
pub struct Photo {
    pub id: u64,
    /// URL of the rendition the pipeline downloads and annotates.
    pub url: String,
}

/// The photo-search seam. Carried as `Arc<dyn PhotoSearch>` so tests can
/// swap in a canned result set.
#[async_trait]
pub trait PhotoSearch: Send + Sync {
    async fn search(&self, query: &str, per_page: u32) -> Result<Vec<Photo>, SearchError>;
}
