// crates/muse-core/src/traits.rs

use async_trait::async_trait;

use crate::error::MuseError;
use crate::item::ArchiveItem;
use crate::request::{CompletionRequest, ImageRequest};

/// A read-only archive that can produce one random item.
///
/// Implemented by muse-sources (museum collection, space-image library).
#[async_trait]
pub trait ArchiveSource: Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Query the archive and normalize one randomly chosen item.
    async fn fetch_random_item(&self) -> Result<ArchiveItem, MuseError>;

    /// Like `fetch_random_item`, but every failure is logged and reported as
    /// `None`. Callers cannot tell failure causes apart.
    async fn get_random_item(&self) -> Option<ArchiveItem> {
        match self.fetch_random_item().await {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::error!("[{}] no item retrieved: {}", self.name(), e);
                None
            }
        }
    }
}

/// Chat completion used to turn item metadata into an image prompt.
///
/// Implemented by muse-openai.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Return the text of the first completion choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, MuseError>;
}

/// Image generation from a text prompt.
///
/// Implemented by muse-openai.
#[async_trait]
pub trait ImageSynthesisService: Send + Sync {
    /// Return the URL of the generated image, or `None` when the service
    /// answered without a usable image.
    async fn synthesize(&self, request: &ImageRequest) -> Result<Option<String>, MuseError>;
}
