// crates/muse-core/src/error.rs

use thiserror::Error;

/// Error types shared by every stage of the generation pipeline.
///
/// None of these escape `GenerationPipeline::generate`; they exist so each
/// boundary can report what failed before the pipeline turns the failure
/// into an absent result.
#[derive(Debug, Error)]
pub enum MuseError {
    /// Archive data could not be fetched or had an unusable shape.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// Transport-level HTTP failure.
    #[error("Network error: {0}")]
    Network(String),

    /// JSON encoding/decoding error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Completion service failed or returned no usable text.
    #[error("Prompt service error: {0}")]
    PromptService(String),

    /// Image synthesis failed or returned no image.
    #[error("Synthesis error: {0}")]
    Synthesis(String),

    /// Image download or file write failed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Invalid or incomplete configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// Notification composition or delivery failed.
    #[error("Notification error: {0}")]
    Notification(String),
}

impl From<serde_json::Error> for MuseError {
    fn from(e: serde_json::Error) -> Self {
        MuseError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for MuseError {
    fn from(e: std::io::Error) -> Self {
        MuseError::Persistence(e.to_string())
    }
}
