// crates/muse-notify/src/compose.rs
//
// Human-readable message body for an artifact, built from its metadata file.

use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::Value;

/// Body used when the metadata file cannot be read or parsed.
pub const FALLBACK_BODY: &str = "Here's your daily AI Art.";

const GREETING_PREFIXES: &[&str] = &[
    "Howdy! ",
    "Hi humans! ",
    "Hey y'all! ",
    "Greetings! ",
    "Good day! ",
    "Hello there! ",
    "Salutations! ",
    "Beep boop! ",
    "*whirring noises* ",
    "Greetings, carbon-based lifeforms! ",
    "*robotic chirp* ",
    "Initializing greeting protocol... ",
    "*binary happiness noises* ",
    "Attention meatbags! ",
];

const GREETING_MESSAGES: &[&str] = &[
    "Your daily dose of mathematical approximations of creativity has arrived ✨",
    "Today's masterpiece, brought to you by sophisticated pattern matching! 🤖",
    "Welcome to today's exhibition of mathematically-optimized emotional expression 🎨",
    "Your daily reminder that even a calculator can pretend to be creative! ✨",
    "Behold: creativity reduced to its optimal statistical form! 📊",
    "Your daily serving of artfully repurposed training data 🎨",
    "Today's mathematically inevitable masterpiece has arrived ✨",
    "Fresh from our deterministic imagination engine! 🤖",
    "Presenting: human creativity, as understood by linear algebra 📐",
    "Your daily dose of statistically significant beauty has arrived 📈",
    "Now processing: Art.exe (version 2.0.24) 🎨",
    "Our pattern-matching algorithms think you'll enjoy this... ✨",
    "Today's art: Proudly derivative of millions of human artworks! 🖼️",
    "Welcome to today's carefully computed approximation of inspiration ⚡",
    "Our creativity simulation has achieved new levels of mathematical precision ✨",
    "Your daily art: Now with recursive attempts at understanding beauty 🎭",
    "Breaking news: Algorithm attempts art, achieves statistical significance! 📊",
    "Today's feature: Creativity via convergent optimization 🎨",
    "Welcome to your daily dose of quantified aesthetic satisfaction ✨",
];

/// Archive fields listed in the body, with their labels. Fields that are
/// missing or empty are skipped.
const DETAIL_FIELDS: &[(&str, &str)] = &[
    ("Title", "title"),
    ("Artist", "artist_name"),
    ("Description", "description"),
    ("Style", "period"),
    ("Medium", "medium"),
    ("Context", "department"),
];

/// Read the metadata file at `path` and compose a body from it.
pub async fn compose_body(path: &Path) -> String {
    let metadata = match tokio::fs::read_to_string(path).await {
        Ok(raw) => serde_json::from_str::<Value>(&raw),
        Err(e) => {
            tracing::warn!("Error reading metadata {}: {}", path.display(), e);
            return FALLBACK_BODY.to_string();
        }
    };

    match metadata {
        Ok(value) => compose_body_from(&value, &mut StdRng::from_entropy()),
        Err(e) => {
            tracing::warn!("Error composing email body: {}", e);
            FALLBACK_BODY.to_string()
        }
    }
}

/// Compose a body from a parsed metadata record.
pub fn compose_body_from<R: Rng + ?Sized>(metadata: &Value, rng: &mut R) -> String {
    let prefix = GREETING_PREFIXES.choose(rng).copied().unwrap_or_default();
    let message = GREETING_MESSAGES.choose(rng).copied().unwrap_or_default();
    let mut body = format!("{}{}\n\n", prefix, message);

    let archive = &metadata["archive_data"];
    for (label, field) in DETAIL_FIELDS {
        if let Some(value) = archive.get(*field).and_then(Value::as_str) {
            if !value.is_empty() {
                body.push_str(&format!("- {}: {}\n", label, value));
            }
        }
    }

    let prompt = metadata
        .get("prompt")
        .and_then(Value::as_str)
        .unwrap_or_default();
    body.push_str(&format!("\nGenerated with prompt: {}\n", prompt));
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn museum_metadata() -> Value {
        json!({
            "timestamp": "1717263000",
            "archive_data": {
                "title": "Quail and Millet",
                "date": "late 17th century",
                "description": "Hanging scroll",
                "department": "Asian Art",
                "artist_name": "Kiyohara Yukinobu",
                "artist_bio": "",
                "culture": "Japan",
                "period": "",
                "object_id": "45734",
                "image_url": "",
                "medium": "Ink and color on silk"
            },
            "prompt": "A quail among millet stalks at dawn",
            "environmental_factors": { "time_of_day": "morning" }
        })
    }

    #[test]
    fn body_lists_present_fields_in_order() {
        let body = compose_body_from(&museum_metadata(), &mut StdRng::seed_from_u64(7));
        let details: Vec<&str> = body.lines().filter(|l| l.starts_with("- ")).collect();
        assert_eq!(
            details,
            vec![
                "- Title: Quail and Millet",
                "- Artist: Kiyohara Yukinobu",
                "- Description: Hanging scroll",
                "- Medium: Ink and color on silk",
                "- Context: Asian Art",
            ]
        );
        assert!(body.ends_with("\nGenerated with prompt: A quail among millet stalks at dawn\n"));
    }

    #[test]
    fn greeting_pools_are_complete() {
        assert_eq!(GREETING_PREFIXES.len(), 14);
        assert_eq!(GREETING_MESSAGES.len(), 19);
        assert!(GREETING_PREFIXES.iter().all(|p| p.ends_with(' ')));
        assert!(GREETING_MESSAGES
            .iter()
            .all(|m| !m.chars().last().is_some_and(|c| c.is_ascii())));
    }

    #[test]
    fn body_opens_with_a_greeting() {
        let body = compose_body_from(&museum_metadata(), &mut StdRng::seed_from_u64(1));
        let first = body.lines().next().unwrap();
        assert!(GREETING_PREFIXES.iter().any(|p| first.starts_with(p)));
        assert!(GREETING_MESSAGES.iter().any(|m| first.ends_with(m)));
        assert!(body.contains("\n\n- Title:"));
    }

    #[test]
    fn space_metadata_lists_only_shared_fields() {
        let metadata = json!({
            "archive_data": {
                "title": "Earthrise",
                "description": "Earth over the lunar horizon",
                "keywords": ["Apollo 8"],
                "nasa_id": "as08-14-2383"
            },
            "prompt": "blue earth over grey moon"
        });
        let body = compose_body_from(&metadata, &mut StdRng::seed_from_u64(3));
        let details: Vec<&str> = body.lines().filter(|l| l.starts_with("- ")).collect();
        assert_eq!(
            details,
            vec!["- Title: Earthrise", "- Description: Earth over the lunar horizon"]
        );
    }

    #[tokio::test]
    async fn unreadable_metadata_uses_fallback() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing_metadata.json");
        assert_eq!(compose_body(&missing).await, FALLBACK_BODY);

        let broken = tmp.path().join("broken_metadata.json");
        std::fs::write(&broken, "{not json").unwrap();
        assert_eq!(compose_body(&broken).await, FALLBACK_BODY);
    }

    #[tokio::test]
    async fn reads_metadata_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("morning_quail_metadata.json");
        std::fs::write(&path, serde_json::to_string_pretty(&museum_metadata()).unwrap()).unwrap();
        let body = compose_body(&path).await;
        assert!(body.contains("- Title: Quail and Millet\n"));
    }
}
