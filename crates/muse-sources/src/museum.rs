// crates/muse-sources/src/museum.rs
//
// Museum collection source. Lists every object id that has an image, picks
// one uniformly at random, and normalizes that object's record.

use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde_json::Value;

use muse_core::{ArchiveItem, ArchiveSource, MuseError, MuseumObjectItem};

use crate::http::archive_session;

/// Random-object source backed by the museum collection API.
#[derive(Debug, Clone)]
pub struct MuseumSource {
    /// Base URL of the collection API (e.g., ".../public/collection/v1").
    pub base_url: String,
}

impl MuseumSource {
    pub const DEFAULT_BASE_URL: &'static str =
        "https://collectionapi.metmuseum.org/public/collection/v1";

    /// Create a source pointing at the given API base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn objects_url(&self) -> String {
        format!("{}/objects", self.base_url)
    }

    fn object_url(&self, object_id: &str) -> String {
        format!("{}/objects/{}", self.base_url, object_id)
    }
}

impl Default for MuseumSource {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl ArchiveSource for MuseumSource {
    fn name(&self) -> &'static str {
        "museum"
    }

    /// GET /objects?hasImages=true, then GET /objects/{id} for a random id.
    async fn fetch_random_item(&self) -> Result<ArchiveItem, MuseError> {
        let session = archive_session()?;

        let url = self.objects_url();
        let response = session
            .get(&url)
            .query(&[("hasImages", "true")])
            .send()
            .await
            .map_err(|e| MuseError::Network(format!("Museum index request failed: {}", e)))?;

        if !response.status().is_success() {
            tracing::debug!("Request URL: {}", response.url());
            return Err(MuseError::SourceUnavailable(format!(
                "Museum API failed with status {}",
                response.status()
            )));
        }

        let index: Value = response
            .json()
            .await
            .map_err(|e| MuseError::Serialization(format!("Museum index parse failed: {}", e)))?;

        let object_id = pick_object_id(&index)?;
        tracing::debug!("Selected museum object {}", object_id);

        let response = session
            .get(self.object_url(&object_id))
            .send()
            .await
            .map_err(|e| MuseError::Network(format!("Museum object request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(MuseError::SourceUnavailable(format!(
                "Museum object fetch failed with status {}",
                response.status()
            )));
        }

        let object: Value = response
            .json()
            .await
            .map_err(|e| MuseError::Serialization(format!("Museum object parse failed: {}", e)))?;

        Ok(MuseumObjectItem::from_api_response(&object).into())
    }
}

/// Choose one id uniformly from the index response's `objectIDs`.
fn pick_object_id(index: &Value) -> Result<String, MuseError> {
    let ids = index
        .get("objectIDs")
        .and_then(Value::as_array)
        .filter(|ids| !ids.is_empty())
        .ok_or_else(|| {
            MuseError::SourceUnavailable("No objects found in museum API response".to_string())
        })?;

    match ids.choose(&mut rand::thread_rng()) {
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        other => Err(MuseError::SourceUnavailable(format!(
            "Unexpected object id in museum API response: {:?}",
            other
        ))),
    }
}
