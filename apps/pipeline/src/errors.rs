use thiserror::Error;

/// Per-item pipeline error.
///
/// Every variant is terminal for one photo only: `batch` logs it and moves
/// on. Nothing here may abort sibling items or the process.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no quote available")]
    QuoteUnavailable,

    #[error("image download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
