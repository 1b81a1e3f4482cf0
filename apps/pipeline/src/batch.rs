//! Batch orchestration — one search call, N independent item pipelines.
//!
//! Items run in a bounded task group (`JoinSet` gated by a `Semaphore`).
//! One item's failure is logged and counted, never propagated to siblings;
//! outputs land in whatever order the external services answer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::errors::PipelineError;
use crate::layout::typeface::TypeFace;
use crate::llm_client::QuoteClient;
use crate::render::{self, ImageFetcher};
use crate::search::{Photo, PhotoSearch};

pub struct Batch {
    pub search: Arc<dyn PhotoSearch>,
    pub quotes: Arc<QuoteClient>,
    pub fetcher: Arc<dyn ImageFetcher>,
    pub face: Arc<dyn TypeFace>,
    pub query: String,
    pub per_page: u32,
    pub output_dir: PathBuf,
    pub max_in_flight: usize,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl Batch {
    /// Runs the whole batch to completion and returns per-item counts.
    ///
    /// A search failure or an empty result set ends the run cleanly; there
    /// is nothing to process, and neither is fatal to the process.
    pub async fn run(&self) -> BatchSummary {
        let photos = match self.search.search(&self.query, self.per_page).await {
            Ok(photos) => photos,
            Err(e) => {
                error!("Error searching photos: {e}");
                return BatchSummary::default();
            }
        };

        if photos.is_empty() {
            info!("No photos found.");
            return BatchSummary::default();
        }

        info!("Processing {} photos", photos.len());

        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let mut tasks = JoinSet::new();

        for photo in photos {
            let semaphore = Arc::clone(&semaphore);
            let quotes = Arc::clone(&self.quotes);
            let fetcher = Arc::clone(&self.fetcher);
            let face = Arc::clone(&self.face);
            let output_dir = self.output_dir.clone();

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore never closed");
                let id = photo.id;
                let result = process_photo(photo, &quotes, &*fetcher, &*face, &output_dir).await;
                (id, result)
            });
        }

        let mut summary = BatchSummary::default();
        while let Some(joined) = tasks.join_next().await {
            summary.processed += 1;
            match joined {
                Ok((id, Ok(path))) => {
                    summary.succeeded += 1;
                    info!("Image {id} processed successfully ({})", path.display());
                }
                Ok((id, Err(e))) => {
                    summary.failed += 1;
                    warn!("Error processing photo {id}: {e}");
                }
                Err(e) => {
                    summary.failed += 1;
                    error!("Item task failed to run: {e}");
                }
            }
        }

        info!(
            "Batch complete: {} succeeded, {} failed",
            summary.succeeded, summary.failed
        );
        summary
    }
}

/// One photo's pipeline: generate → fetch → decode → compose → write.
/// Stage order is strict within an item; every error is terminal here and
/// handled by the caller.
async fn process_photo(
    photo: Photo,
    quotes: &QuoteClient,
    fetcher: &dyn ImageFetcher,
    face: &dyn TypeFace,
    output_dir: &Path,
) -> Result<PathBuf, PipelineError> {
    let quote = quotes
        .generate()
        .await
        .ok_or(PipelineError::QuoteUnavailable)?;

    let bytes = fetcher.fetch(&photo.url).await?;
    let source = render::decode(&bytes)?;
    let canvas = render::compose(&source, &quote, face);

    let path = output_dir.join(format!("{}.jpg", photo.id));
    render::write_jpeg(canvas, &path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use bytes::Bytes;
    use image::{DynamicImage, Rgba, RgbaImage};

    use super::*;
    use crate::layout::typeface::FixedWidthFace;
    use crate::llm_client::{LlmError, TextGenerator};
    use crate::search::SearchError;

    struct StaticSearch {
        photos: Vec<Photo>,
    }

    #[async_trait]
    impl PhotoSearch for StaticSearch {
        async fn search(&self, _query: &str, _per_page: u32) -> Result<Vec<Photo>, SearchError> {
            Ok(self.photos.clone())
        }
    }

    struct FailingSearch;

    #[async_trait]
    impl PhotoSearch for FailingSearch {
        async fn search(&self, _query: &str, _per_page: u32) -> Result<Vec<Photo>, SearchError> {
            Err(SearchError::Api {
                status: 500,
                message: "boom".to_string(),
            })
        }
    }

    /// Succeeds for the first `successes` calls, then fails terminally.
    struct CountdownGenerator {
        calls: AtomicU32,
        successes: u32,
    }

    #[async_trait]
    impl TextGenerator for CountdownGenerator {
        async fn generate_content(&self, _prompt: &str) -> Result<String, LlmError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.successes {
                Ok("A short inspiring line".to_string())
            } else {
                Err(LlmError::Api {
                    status: 500,
                    message: "internal".to_string(),
                })
            }
        }
    }

    /// Serves the same in-memory PNG for every URL.
    struct StaticFetcher {
        bytes: Bytes,
    }

    impl StaticFetcher {
        fn with_png(width: u32, height: u32) -> Self {
            let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                width,
                height,
                Rgba([120, 80, 200, 255]),
            ));
            let mut cursor = Cursor::new(Vec::new());
            source
                .write_to(&mut cursor, image::ImageFormat::Png)
                .unwrap();
            Self {
                bytes: Bytes::from(cursor.into_inner()),
            }
        }
    }

    #[async_trait]
    impl ImageFetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<Bytes, PipelineError> {
            Ok(self.bytes.clone())
        }
    }

    fn photo(id: u64) -> Photo {
        Photo {
            id,
            url: format!("https://photos.test/{id}/large.jpg"),
        }
    }

    fn batch_with(
        photos: Vec<Photo>,
        generator: Arc<dyn TextGenerator>,
        output_dir: PathBuf,
        max_in_flight: usize,
    ) -> Batch {
        Batch {
            search: Arc::new(StaticSearch { photos }),
            quotes: Arc::new(QuoteClient::new(generator)),
            fetcher: Arc::new(StaticFetcher::with_png(640, 360)),
            face: Arc::new(FixedWidthFace {
                advance: 10.0,
                height: 20.0,
            }),
            query: "space".to_string(),
            per_page: 50,
            output_dir,
            max_in_flight,
        }
    }

    #[tokio::test]
    async fn test_single_photo_writes_output_keyed_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(CountdownGenerator {
            calls: AtomicU32::new(0),
            successes: u32::MAX,
        });
        let batch = batch_with(vec![photo(42)], generator, dir.path().to_path_buf(), 8);

        let summary = batch.run().await;

        assert_eq!(
            summary,
            BatchSummary {
                processed: 1,
                succeeded: 1,
                failed: 0
            }
        );
        let output = dir.path().join("42.jpg");
        assert!(output.exists(), "expected {} to be written", output.display());
        assert_eq!(image::open(&output).unwrap().width(), 1920);
    }

    #[tokio::test]
    async fn test_sibling_generation_failure_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        // Exactly one generation call succeeds; the other item fails
        // terminally and must not take the successful one down with it.
        let generator = Arc::new(CountdownGenerator {
            calls: AtomicU32::new(0),
            successes: 1,
        });
        let batch = batch_with(
            vec![photo(1), photo(2)],
            generator,
            dir.path().to_path_buf(),
            1,
        );

        let summary = batch.run().await;

        assert_eq!(
            summary,
            BatchSummary {
                processed: 2,
                succeeded: 1,
                failed: 1
            }
        );
        let outputs: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(outputs.len(), 1, "exactly one item should produce output");
    }

    #[tokio::test]
    async fn test_empty_search_result_is_a_clean_noop() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(CountdownGenerator {
            calls: AtomicU32::new(0),
            successes: u32::MAX,
        });
        let batch = batch_with(vec![], generator.clone(), dir.path().to_path_buf(), 8);

        let summary = batch.run().await;

        assert_eq!(summary, BatchSummary::default());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_failure_aborts_batch_without_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let batch = Batch {
            search: Arc::new(FailingSearch),
            quotes: Arc::new(QuoteClient::new(Arc::new(CountdownGenerator {
                calls: AtomicU32::new(0),
                successes: u32::MAX,
            }))),
            fetcher: Arc::new(StaticFetcher::with_png(640, 360)),
            face: Arc::new(FixedWidthFace {
                advance: 10.0,
                height: 20.0,
            }),
            query: "space".to_string(),
            per_page: 50,
            output_dir: dir.path().to_path_buf(),
            max_in_flight: 8,
        };

        assert_eq!(batch.run().await, BatchSummary::default());
    }
}
