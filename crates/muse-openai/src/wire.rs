// crates/muse-openai/src/wire.rs
//
// Request/response bodies for the chat completion and image generation
// endpoints. Only the fields Muse reads are modelled.

use serde::{Deserialize, Serialize};

use muse_core::{CompletionRequest, ImageRequest};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Body for POST /v1/chat/completions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionBody {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

impl From<&CompletionRequest> for ChatCompletionBody {
    fn from(request: &CompletionRequest) -> Self {
        Self {
            model: request.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user.clone(),
                },
            ],
            max_tokens: request.max_tokens,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

/// Body for POST /v1/images/generations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageGenerationBody {
    pub model: String,
    pub prompt: String,
    pub size: String,
    pub quality: String,
    pub n: u32,
}

impl From<&ImageRequest> for ImageGenerationBody {
    fn from(request: &ImageRequest) -> Self {
        Self {
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            size: request.size.clone(),
            quality: request.quality.clone(),
            n: request.n,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub data: Vec<ImageDatum>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageDatum {
    #[serde(default)]
    pub url: Option<String>,
}

impl ImageGenerationResponse {
    /// URL of the first image, ignoring empty strings.
    pub fn first_url(&self) -> Option<&str> {
        self.data
            .first()
            .and_then(|d| d.url.as_deref())
            .filter(|url| !url.is_empty())
    }
}
