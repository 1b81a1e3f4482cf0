//! Pexels backend for the `PhotoSearch` trait.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{Photo, PhotoSearch, SearchError};

const PEXELS_API_URL: &str = "https://api.pexels.com/v1/search";
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Debug, Deserialize)]
struct PexelsPhoto {
    id: u64,
    src: PhotoSources,
}

#[derive(Debug, Deserialize)]
struct PhotoSources {
    large: String,
}

impl From<PexelsPhoto> for Photo {
    fn from(photo: PexelsPhoto) -> Self {
        Photo {
            id: photo.id,
            url: photo.src.large,
        }
    }
}

#[derive(Clone)]
pub struct PexelsClient {
    client: Client,
    api_key: String,
}

impl PexelsClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl PhotoSearch for PexelsClient {
    async fn search(&self, query: &str, per_page: u32) -> Result<Vec<Photo>, SearchError> {
        let per_page = per_page.to_string();
        let response = self
            .client
            .get(PEXELS_API_URL)
            .header("Authorization", &self.api_key)
            .query(&[("query", query), ("per_page", per_page.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: SearchResponse = response.json().await?;
        debug!("Search returned {} photos for '{query}'", parsed.photos.len());

        Ok(parsed.photos.into_iter().map(Photo::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_maps_id_and_large_rendition() {
        let raw = r#"{
            "page": 1,
            "per_page": 2,
            "photos": [
                {
                    "id": 2014422,
                    "width": 3024,
                    "height": 3024,
                    "url": "https://www.pexels.com/photo/2014422/",
                    "photographer": "Joey Farina",
                    "src": {
                        "original": "https://images.pexels.com/photos/2014422/original.jpg",
                        "large": "https://images.pexels.com/photos/2014422/large.jpg",
                        "medium": "https://images.pexels.com/photos/2014422/medium.jpg"
                    }
                }
            ],
            "total_results": 8000
        }"#;
        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        let photos: Vec<Photo> = parsed.photos.into_iter().map(Photo::from).collect();

        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].id, 2014422);
        assert_eq!(
            photos[0].url,
            "https://images.pexels.com/photos/2014422/large.jpg"
        );
    }

    #[test]
    fn test_search_response_empty_photos() {
        let parsed: SearchResponse =
            serde_json::from_str(r#"{"page": 1, "photos": [], "total_results": 0}"#).unwrap();
        assert!(parsed.photos.is_empty());
    }
}
