// crates/muse-sources/src/space.rs
//
// Space-image library source. Runs one keyword search on a random results
// page and normalizes a random hit.

use std::ops::RangeInclusive;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

use muse_core::{ArchiveItem, ArchiveSource, MuseError, SpaceImageItem};

use crate::http::archive_session;

/// Search terms a query keyword is drawn from.
pub const SEARCH_KEYWORDS: [&str; 6] = ["galaxy", "mars", "satellite", "nebula", "earth", "astronaut"];

/// Result pages a query is drawn from. Spreads picks without full pagination.
pub const SEARCH_PAGES: RangeInclusive<u32> = 1..=4;

/// Media type filter applied to every search.
pub const SEARCH_MEDIA_TYPE: &str = "image";

/// Random-image source backed by the space-image library search API.
#[derive(Debug, Clone)]
pub struct SpaceImageSource {
    /// Base URL of the image library API (e.g., "https://images-api.nasa.gov").
    pub base_url: String,
}

impl SpaceImageSource {
    pub const DEFAULT_BASE_URL: &'static str = "https://images-api.nasa.gov";

    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

impl Default for SpaceImageSource {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl ArchiveSource for SpaceImageSource {
    fn name(&self) -> &'static str {
        "space"
    }

    /// GET /search?q={keyword}&media_type=image&page={page}
    async fn fetch_random_item(&self) -> Result<ArchiveItem, MuseError> {
        let (keyword, page) = random_query();
        let session = archive_session()?;

        let response = session
            .get(self.search_url())
            .query(&[
                ("q", keyword.to_string()),
                ("media_type", SEARCH_MEDIA_TYPE.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| MuseError::Network(format!("Space image search request failed: {}", e)))?;

        if !response.status().is_success() {
            tracing::debug!("Request URL: {}", response.url());
            return Err(MuseError::SourceUnavailable(format!(
                "Space image API failed with status {}",
                response.status()
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            MuseError::Serialization(format!("Space image search parse failed: {}", e))
        })?;

        let item = select_item(&body).map_err(|e| {
            tracing::debug!("Query: q={} page={}", keyword, page);
            e
        })?;
        Ok(item.into())
    }
}

fn random_query() -> (&'static str, u32) {
    let mut rng = rand::thread_rng();
    let keyword = SEARCH_KEYWORDS.choose(&mut rng).copied().unwrap_or("galaxy");
    let page = rng.gen_range(SEARCH_PAGES);
    (keyword, page)
}

/// Pick one hit from `collection.items` and normalize its first `data` block.
/// A hit without data normalizes to placeholders.
fn select_item(body: &Value) -> Result<SpaceImageItem, MuseError> {
    let items = body
        .get("collection")
        .and_then(|c| c.get("items"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            MuseError::SourceUnavailable("Unexpected space image API response format".to_string())
        })?;

    let selected = items
        .choose(&mut rand::thread_rng())
        .ok_or_else(|| MuseError::SourceUnavailable("No results found from space image API".to_string()))?;

    let data = selected
        .get("data")
        .and_then(Value::as_array)
        .and_then(|blocks| blocks.first())
        .unwrap_or(&Value::Null);

    Ok(SpaceImageItem::from_api_response(data))
}
