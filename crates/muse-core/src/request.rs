// crates/muse-core/src/request.rs
//
// Request shapes for the completion and image-synthesis boundaries.

use serde::{Deserialize, Serialize};

/// One prompt-engineering request to a chat completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    /// System instruction.
    pub system: String,
    /// User instruction carrying the element block and time of day.
    pub user: String,
    pub max_tokens: u32,
}

/// One image-synthesis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    /// Square resolution, e.g. "1024x1024".
    pub size: String,
    /// Quality tier, e.g. "standard".
    pub quality: String,
    /// Number of images; the pipeline always asks for one.
    pub n: u32,
}
