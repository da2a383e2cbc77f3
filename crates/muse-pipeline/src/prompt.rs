// crates/muse-pipeline/src/prompt.rs
//
// Image prompt construction from an item's prompt elements.

use std::sync::Arc;

use muse_core::{ArchiveItem, CompletionRequest, CompletionService, PromptElements, TimeOfDay};

/// System instruction sent with every completion request.
pub const SYSTEM_INSTRUCTION: &str = "You are a creative prompt engineer specializing in visual art generation. \
Given historical archive information, create an engaging and detailed DALL-E prompt. \
Focus on visual elements, artistic style, and mood while incorporating historical context. \
Keep prompts concise but descriptive, under 200 characters.";

/// Model and token ceiling for prompt completions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSettings {
    pub model: String,
    pub max_tokens: u32,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 100,
        }
    }
}

/// Builds image prompts through a completion service.
#[derive(Clone)]
pub struct PromptBuilder {
    service: Arc<dyn CompletionService>,
    settings: PromptSettings,
}

impl PromptBuilder {
    pub fn new(service: Arc<dyn CompletionService>) -> Self {
        Self {
            service,
            settings: PromptSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: PromptSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The completion request for `item` at `time_of_day`.
    pub fn request(&self, item: &ArchiveItem, time_of_day: TimeOfDay) -> CompletionRequest {
        let block = element_block(&item.get_prompt_elements());
        CompletionRequest {
            model: self.settings.model.clone(),
            system: SYSTEM_INSTRUCTION.to_string(),
            user: format!(
                "Create a DALL-E prompt based on:\n{}\n- Time of day: {}",
                block, time_of_day
            ),
            max_tokens: self.settings.max_tokens,
        }
    }

    /// Ask the completion service for a prompt. Any failure, including an
    /// empty answer, yields the templated fallback instead.
    pub async fn build(&self, item: &ArchiveItem, time_of_day: TimeOfDay) -> String {
        let request = self.request(item, time_of_day);
        tracing::debug!("Prompt elements:\n{}", element_block(&item.get_prompt_elements()));

        match self.service.complete(&request).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                tracing::warn!("Completion returned empty text, using fallback prompt");
                fallback_prompt(time_of_day, item.title())
            }
            Err(e) => {
                tracing::warn!("Error generating prompt: {}", e);
                fallback_prompt(time_of_day, item.title())
            }
        }
    }
}

/// Prompt used whenever the completion service cannot provide one.
pub fn fallback_prompt(time_of_day: TimeOfDay, title: &str) -> String {
    format!("A {} scene inspired by {}, artistic style", time_of_day, title)
}

/// One `- Key: value` line per element.
pub fn element_block(elements: &PromptElements) -> String {
    elements
        .iter()
        .map(|(key, value)| format!("- {}: {}", title_case(key), value.render()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Uppercase the first letter of each word and lowercase the rest.
fn title_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut at_word_start = true;
    for c in key.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use muse_core::{MuseError, MuseumObjectItem, SpaceImageItem};
    use serde_json::json;
    use std::sync::Mutex;

    /// Completion service returning a fixed outcome and recording requests.
    struct Scripted {
        reply: Result<String, String>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl Scripted {
        fn new(reply: Result<&str, &str>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.map(str::to_string).map_err(str::to_string),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionService for Scripted {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, MuseError> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply.clone().map_err(MuseError::PromptService)
        }
    }

    fn museum_item() -> ArchiveItem {
        MuseumObjectItem::from_api_response(&json!({
            "title": "Water Lilies",
            "objectName": "Painting",
            "department": "European Paintings",
            "artistDisplayName": "Claude Monet",
            "culture": "French",
            "medium": "Oil on canvas"
        }))
        .into()
    }

    #[test]
    fn element_block_title_cases_keys_and_joins_lists() {
        let item: ArchiveItem = SpaceImageItem::from_api_response(&json!({
            "title": "Earthrise",
            "description": "Earth over the lunar horizon",
            "keywords": ["Apollo 8", "Moon"],
        }))
        .into();
        assert_eq!(
            element_block(&item.get_prompt_elements()),
            "- Title: Earthrise\n- Description: Earth over the lunar horizon\n- Subjects: Apollo 8, Moon"
        );
    }

    #[test]
    fn title_case_handles_separators() {
        assert_eq!(title_case("time of_day"), "Time Of_Day");
        assert_eq!(title_case("context"), "Context");
    }

    #[test]
    fn request_carries_block_and_time_of_day() {
        let builder = PromptBuilder::new(Scripted::new(Ok("x")));
        let request = builder.request(&museum_item(), TimeOfDay::Sunset);
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.max_tokens, 100);
        assert_eq!(request.system, SYSTEM_INSTRUCTION);
        assert!(request.user.starts_with("Create a DALL-E prompt based on:\n- Title: Water Lilies\n"));
        assert!(request.user.contains("- Artist: Claude Monet\n"));
        assert!(request.user.contains("- Style: French\n"));
        assert!(request.user.ends_with("- Time of day: sunset"));
    }

    #[tokio::test]
    async fn build_returns_completion_text() {
        let service = Scripted::new(Ok("  Monet lilies under a violet dusk  "));
        let builder = PromptBuilder::new(service.clone());
        let prompt = builder.build(&museum_item(), TimeOfDay::Sunset).await;
        assert_eq!(prompt, "Monet lilies under a violet dusk");
        assert_eq!(service.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn build_falls_back_on_failure() {
        let builder = PromptBuilder::new(Scripted::new(Err("timeout")));
        let prompt = builder.build(&museum_item(), TimeOfDay::Morning).await;
        assert_eq!(prompt, "A morning scene inspired by Water Lilies, artistic style");
    }

    #[tokio::test]
    async fn build_falls_back_on_blank_text() {
        let builder = PromptBuilder::new(Scripted::new(Ok("   ")));
        let prompt = builder.build(&museum_item(), TimeOfDay::Night).await;
        assert_eq!(prompt, fallback_prompt(TimeOfDay::Night, "Water Lilies"));
    }

    #[tokio::test]
    async fn custom_settings_are_used() {
        let service = Scripted::new(Ok("ok"));
        let builder = PromptBuilder::new(service.clone()).with_settings(PromptSettings {
            model: "local-model".to_string(),
            max_tokens: 42,
        });
        builder.build(&museum_item(), TimeOfDay::Afternoon).await;
        let seen = service.seen.lock().unwrap();
        assert_eq!(seen[0].model, "local-model");
        assert_eq!(seen[0].max_tokens, 42);
    }
}
