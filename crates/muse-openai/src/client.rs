// crates/muse-openai/src/client.rs
//
// OpenAI-compatible client. Uses reqwest against the REST endpoints with a
// bearer token.

use async_trait::async_trait;

use muse_core::{
    CompletionRequest, CompletionService, ImageRequest, ImageSynthesisService, MuseError,
};

use crate::wire::{
    ChatCompletionBody, ChatCompletionResponse, ImageGenerationBody, ImageGenerationResponse,
};

/// Client for the chat completion and image generation endpoints.
#[derive(Clone)]
pub struct OpenAiClient {
    /// Base URL of the API (e.g., "https://api.openai.com").
    pub base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl OpenAiClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com";

    /// Create a client. Fails when the API key is blank.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, MuseError> {
        if api_key.trim().is_empty() {
            return Err(MuseError::Config("OpenAI API key is required".to_string()));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
        })
    }

    /// POST `body` as JSON and decode the JSON answer. Every failure is
    /// reported through `fail`, so each endpoint keeps its own error kind.
    async fn post_json<B, R>(
        &self,
        path: &str,
        body: &B,
        fail: fn(String) -> MuseError,
    ) -> Result<R, MuseError>
    where
        B: serde::Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| fail(format!("POST {} request failed: {}", path, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(fail(format!("POST {} returned status {}: {}", path, status, text)));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| fail(format!("POST {} response parse failed: {}", path, e)))
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    /// POST /v1/chat/completions
    async fn complete(&self, request: &CompletionRequest) -> Result<String, MuseError> {
        let body = ChatCompletionBody::from(request);
        let response: ChatCompletionResponse = self
            .post_json("/v1/chat/completions", &body, MuseError::PromptService)
            .await?;

        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| MuseError::PromptService("Chat completion returned no text".to_string()))
    }
}

#[async_trait]
impl ImageSynthesisService for OpenAiClient {
    /// POST /v1/images/generations
    async fn synthesize(&self, request: &ImageRequest) -> Result<Option<String>, MuseError> {
        let body = ImageGenerationBody::from(request);
        let response: ImageGenerationResponse = self
            .post_json("/v1/images/generations", &body, MuseError::Synthesis)
            .await?;

        Ok(response.first_url().map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muse_core::mock_http::{MockRoute, MockServer};
    use serde_json::Value;

    fn completion_request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o-mini".to_string(),
            system: "be brief".to_string(),
            user: "- Title: Vase".to_string(),
            max_tokens: 100,
        }
    }

    fn image_request() -> ImageRequest {
        ImageRequest {
            model: "dall-e-3".to_string(),
            prompt: "a vase at sunset".to_string(),
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
            n: 1,
        }
    }

    #[test]
    fn blank_api_key_is_rejected() {
        match OpenAiClient::new(OpenAiClient::DEFAULT_BASE_URL, "  ") {
            Err(MuseError::Config(msg)) => assert!(msg.contains("API key")),
            other => panic!("Expected Config error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn complete_returns_first_choice() {
        let mut server = MockServer::start(vec![MockRoute::json(
            "/v1/chat/completions",
            200,
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"An ink vase glowing at dusk"}},{"index":1,"message":{"role":"assistant","content":"second"}}]}"#,
        )])
        .await;
        let client = OpenAiClient::new(&server.base_url, "sk-test").unwrap();

        let text = client.complete(&completion_request()).await.unwrap();
        assert_eq!(text, "An ink vase glowing at dusk");

        let requests = server.take_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert!(requests[0]
            .head
            .to_ascii_lowercase()
            .contains("authorization: bearer sk-test"));
        let body: Value = serde_json::from_str(&requests[0].body_text()).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 100);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "- Title: Vase");
    }

    #[tokio::test]
    async fn complete_without_content_is_an_error() {
        let server = MockServer::start(vec![MockRoute::json(
            "/v1/chat/completions",
            200,
            r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#,
        )])
        .await;
        let client = OpenAiClient::new(&server.base_url, "sk-test").unwrap();
        assert!(matches!(
            client.complete(&completion_request()).await,
            Err(MuseError::PromptService(_))
        ));
    }

    #[tokio::test]
    async fn complete_error_status_is_prompt_service_error() {
        let server = MockServer::start(vec![MockRoute::json(
            "/v1/chat/completions",
            429,
            r#"{"error":{"message":"rate limited"}}"#,
        )])
        .await;
        let client = OpenAiClient::new(&server.base_url, "sk-test").unwrap();
        match client.complete(&completion_request()).await {
            Err(MuseError::PromptService(msg)) => assert!(msg.contains("429")),
            other => panic!("Expected PromptService error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn synthesize_returns_first_url() {
        let mut server = MockServer::start(vec![MockRoute::json(
            "/v1/images/generations",
            200,
            r#"{"created":1,"data":[{"url":"https://img.example/abc.png","revised_prompt":"x"}]}"#,
        )])
        .await;
        let client = OpenAiClient::new(&server.base_url, "sk-test").unwrap();

        let url = client.synthesize(&image_request()).await.unwrap();
        assert_eq!(url.as_deref(), Some("https://img.example/abc.png"));

        let requests = server.take_requests();
        let body: Value = serde_json::from_str(&requests[0].body_text()).unwrap();
        assert_eq!(body["size"], "1024x1024");
        assert_eq!(body["quality"], "standard");
        assert_eq!(body["n"], 1);
    }

    #[tokio::test]
    async fn synthesize_without_data_is_none() {
        let server = MockServer::start(vec![MockRoute::json(
            "/v1/images/generations",
            200,
            r#"{"created":1,"data":[]}"#,
        )])
        .await;
        let client = OpenAiClient::new(&server.base_url, "sk-test").unwrap();
        assert_eq!(client.synthesize(&image_request()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unparseable_answers_keep_their_endpoint_error_kind() {
        let server = MockServer::start(vec![
            MockRoute::json("/v1/chat/completions", 200, "<html>gateway</html>"),
            MockRoute::json("/v1/images/generations", 200, "{\"data\": 42}"),
        ])
        .await;
        let client = OpenAiClient::new(&server.base_url, "sk-test").unwrap();

        match client.complete(&completion_request()).await {
            Err(MuseError::PromptService(msg)) => {
                assert!(msg.contains("/v1/chat/completions response parse failed"), "{}", msg)
            }
            other => panic!("Expected PromptService error, got: {:?}", other),
        }
        match client.synthesize(&image_request()).await {
            Err(MuseError::Synthesis(msg)) => {
                assert!(msg.contains("/v1/images/generations response parse failed"), "{}", msg)
            }
            other => panic!("Expected Synthesis error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn synthesize_connection_error_is_synthesis_error() {
        let client = OpenAiClient::new("http://127.0.0.1:1", "sk-test").unwrap();
        match client.synthesize(&image_request()).await {
            Err(MuseError::Synthesis(msg)) => assert!(msg.contains("request failed")),
            other => panic!("Expected Synthesis error, got: {:?}", other),
        }
    }
}
