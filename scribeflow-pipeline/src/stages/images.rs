/// Image fetch stage
///
/// The only degradable stage: a failure here never fails the pipeline, the
/// orchestrator just continues without imagery. `UnsplashFetcher` queries
/// the Unsplash search API using the primary keywords.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{ImageFetcher, StageError, StageResult};
use scribeflow_shared::models::article::ImageData;

/// Unsplash-backed image fetcher
pub struct UnsplashFetcher {
    client: reqwest::Client,
    access_key: String,
    base_url: String,
}

impl UnsplashFetcher {
    pub fn new(access_key: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            access_key: access_key.into(),
            base_url: "https://api.unsplash.com".to_string(),
        }
    }

    /// Overrides the API base URL (tests point this at a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn search(&self, query: &str, per_page: usize) -> StageResult<Vec<ImageData>> {
        if self.access_key.is_empty() {
            return Err(StageError::new("Image provider key is not configured"));
        }

        let url = format!(
            "{}/search/photos?query={}&per_page={}",
            self.base_url,
            urlencode(query),
            per_page
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .send()
            .await
            .map_err(|e| StageError::new(format!("Image search failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StageError::new(format!(
                "Image provider returned HTTP {}",
                status.as_u16()
            )));
        }

        let payload: SearchResponse = response
            .json()
            .await
            .map_err(|e| StageError::new(format!("Image response was not JSON: {}", e)))?;

        Ok(payload
            .results
            .into_iter()
            .map(|photo| ImageData {
                url: photo.urls.regular,
                thumb_url: photo.urls.thumb,
                photographer: photo.user.map(|u| u.name),
                alt_text: photo
                    .alt_description
                    .unwrap_or_else(|| query.to_string()),
            })
            .collect())
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<Photo>,
}

#[derive(Deserialize)]
struct Photo {
    urls: PhotoUrls,
    user: Option<PhotoUser>,
    alt_description: Option<String>,
}

#[derive(Deserialize)]
struct PhotoUrls {
    regular: String,
    thumb: Option<String>,
}

#[derive(Deserialize)]
struct PhotoUser {
    name: String,
}

#[async_trait]
impl ImageFetcher for UnsplashFetcher {
    async fn featured_image(&self, keywords: &[String]) -> StageResult<Option<ImageData>> {
        let query = keywords.iter().take(3).cloned().collect::<Vec<_>>().join(" ");
        let mut results = self.search(&query, 1).await?;
        let first = results.drain(..).next();
        Ok(first)
    }

    async fn section_images(
        &self,
        keywords: &[String],
        count: usize,
    ) -> StageResult<Vec<ImageData>> {
        let query = keywords.iter().take(3).cloned().collect::<Vec<_>>().join(" ");
        self.search(&query, count).await
    }
}

/// Percent-encodes a search query for a URL query parameter
fn urlencode(s: &str) -> String {
    s.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            b' ' => "+".to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}
