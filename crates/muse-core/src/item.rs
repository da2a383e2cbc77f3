// crates/muse-core/src/item.rs
//
// Normalized archive records. Each variant owns the conversion from its raw,
// untyped API response into a typed record, so nothing downstream ever looks
// at response JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Base URL the museum's `primaryImage` filename is substituted into.
pub const MUSEUM_IMAGE_BASE_URL: &str = "https://images.metmuseum.org/CRDImages/ep/original/";

/// Maximum number of characters of a space-image description used in prompts.
pub const SPACE_DESCRIPTION_PROMPT_CHARS: usize = 200;

/// A single prompt element value: plain text or a list of terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptValue {
    Text(String),
    List(Vec<String>),
}

impl PromptValue {
    /// Render the value on one line; list entries are joined with ", ".
    pub fn render(&self) -> String {
        match self {
            PromptValue::Text(s) => s.clone(),
            PromptValue::List(items) => items.join(", "),
        }
    }
}

/// Ordered key/value projection of an item used to build prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptElements {
    entries: Vec<(&'static str, PromptValue)>,
}

impl PromptElements {
    fn with_text(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.entries.push((key, PromptValue::Text(value.into())));
        self
    }

    fn with_list(mut self, key: &'static str, values: Vec<String>) -> Self {
        self.entries.push((key, PromptValue::List(values)));
        self
    }

    /// Look up an element by key.
    pub fn get(&self, key: &str) -> Option<&PromptValue> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Keys in projection order.
    pub fn keys(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(k, _)| *k).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &PromptValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }
}

/// An object from the museum collection.
///
/// Every field is a string; anything missing upstream becomes `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuseumObjectItem {
    pub title: String,
    pub date: String,
    pub description: String,
    pub department: String,
    pub artist_name: String,
    pub artist_bio: String,
    pub culture: String,
    pub period: String,
    pub object_id: String,
    pub image_url: String,
    pub medium: String,
}

impl MuseumObjectItem {
    /// Normalize a per-object response from the museum API.
    pub fn from_api_response(object: &Value) -> Self {
        let primary_image = string_or(object, "primaryImage", "");
        let image_url = if primary_image.is_empty() {
            String::new()
        } else {
            format!("{}{}", MUSEUM_IMAGE_BASE_URL, primary_image)
        };

        Self {
            title: string_or(object, "title", ""),
            date: string_or(object, "objectDate", ""),
            description: string_or(object, "objectName", ""),
            department: string_or(object, "department", ""),
            artist_name: string_or(object, "artistDisplayName", ""),
            artist_bio: string_or(object, "artistDisplayBio", ""),
            culture: string_or(object, "culture", ""),
            period: string_or(object, "period", ""),
            object_id: string_or(object, "objectID", ""),
            image_url,
            medium: string_or(object, "medium", ""),
        }
    }

    pub fn prompt_elements(&self) -> PromptElements {
        PromptElements::default()
            .with_text("title", self.title.clone())
            .with_text("description", self.description.clone())
            .with_text("style", format!("{} {}", self.culture, self.period).trim())
            .with_text(
                "artist",
                format!("{} {}", self.artist_name, self.artist_bio).trim(),
            )
            .with_text("medium", self.medium.clone())
            .with_text("context", self.department.clone())
    }
}

/// An image record from the space-image library.
///
/// Missing fields fall back to readable placeholders rather than `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceImageItem {
    pub title: String,
    pub date: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub nasa_id: String,
    pub media_type: String,
}

impl SpaceImageItem {
    /// Normalize the first `data` block of a search result item.
    pub fn from_api_response(data: &Value) -> Self {
        let keywords = data
            .get("keywords")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            title: string_or(data, "title", "Unknown Title"),
            date: string_or(data, "date_created", "Unknown Date"),
            description: string_or(data, "description", "No description available."),
            keywords,
            nasa_id: string_or(data, "nasa_id", "Unknown ID"),
            media_type: string_or(data, "media_type", "Unknown"),
        }
    }

    pub fn prompt_elements(&self) -> PromptElements {
        let description: String = self
            .description
            .chars()
            .take(SPACE_DESCRIPTION_PROMPT_CHARS)
            .collect();

        PromptElements::default()
            .with_text("title", self.title.clone())
            .with_text("description", description)
            .with_list("subjects", self.keywords.clone())
    }
}

/// One item drawn from an archive.
///
/// Serialized untagged so the metadata record carries exactly the variant's
/// own field set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArchiveItem {
    Museum(MuseumObjectItem),
    Space(SpaceImageItem),
}

impl ArchiveItem {
    pub fn title(&self) -> &str {
        match self {
            ArchiveItem::Museum(item) => &item.title,
            ArchiveItem::Space(item) => &item.title,
        }
    }

    /// Project the item into the elements used for prompt construction.
    pub fn get_prompt_elements(&self) -> PromptElements {
        match self {
            ArchiveItem::Museum(item) => item.prompt_elements(),
            ArchiveItem::Space(item) => item.prompt_elements(),
        }
    }
}

impl From<MuseumObjectItem> for ArchiveItem {
    fn from(item: MuseumObjectItem) -> Self {
        ArchiveItem::Museum(item)
    }
}

impl From<SpaceImageItem> for ArchiveItem {
    fn from(item: SpaceImageItem) -> Self {
        ArchiveItem::Space(item)
    }
}

/// Read `key` as a string. Numbers and booleans are stringified; missing or
/// null values (and nested structures) yield `default`.
fn string_or(value: &Value, key: &str, default: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn museum_response() -> Value {
        json!({
            "objectID": 437133,
            "title": "Water Lilies",
            "objectDate": "1916-19",
            "objectName": "Painting",
            "department": "European Paintings",
            "artistDisplayName": "Claude Monet",
            "artistDisplayBio": "French, Paris 1840-1926 Giverny",
            "culture": "",
            "period": "",
            "primaryImage": "DP-1234-001.jpg",
            "medium": "Oil on canvas"
        })
    }

    #[test]
    fn museum_item_normalizes_fields() {
        let item = MuseumObjectItem::from_api_response(&museum_response());
        assert_eq!(item.title, "Water Lilies");
        assert_eq!(item.date, "1916-19");
        assert_eq!(item.description, "Painting");
        assert_eq!(item.object_id, "437133");
        assert_eq!(
            item.image_url,
            "https://images.metmuseum.org/CRDImages/ep/original/DP-1234-001.jpg"
        );
    }

    #[test]
    fn museum_item_missing_fields_become_empty() {
        let item = MuseumObjectItem::from_api_response(&json!({ "title": null }));
        assert_eq!(item.title, "");
        assert_eq!(item.artist_name, "");
        assert_eq!(item.object_id, "");
        assert_eq!(item.image_url, "");
    }

    #[test]
    fn museum_item_empty_primary_image_has_no_url() {
        let item = MuseumObjectItem::from_api_response(&json!({ "primaryImage": "" }));
        assert_eq!(item.image_url, "");
    }

    #[test]
    fn museum_prompt_elements_keys_and_values() {
        let item = MuseumObjectItem::from_api_response(&museum_response());
        let elements = item.prompt_elements();
        assert_eq!(
            elements.keys(),
            vec!["title", "description", "style", "artist", "medium", "context"]
        );
        assert_eq!(elements.get("style"), Some(&PromptValue::Text(String::new())));
        assert_eq!(
            elements.get("artist"),
            Some(&PromptValue::Text(
                "Claude Monet French, Paris 1840-1926 Giverny".to_string()
            ))
        );
        assert_eq!(
            elements.get("context"),
            Some(&PromptValue::Text("European Paintings".to_string()))
        );
    }

    #[test]
    fn space_item_missing_fields_use_placeholders() {
        let item = SpaceImageItem::from_api_response(&json!({}));
        assert_eq!(item.title, "Unknown Title");
        assert_eq!(item.date, "Unknown Date");
        assert_eq!(item.description, "No description available.");
        assert!(item.keywords.is_empty());
        assert_eq!(item.nasa_id, "Unknown ID");
        assert_eq!(item.media_type, "Unknown");
    }

    #[test]
    fn space_prompt_elements_truncate_description() {
        let item = SpaceImageItem::from_api_response(&json!({
            "title": "Crab Nebula",
            "description": "x".repeat(500),
            "keywords": ["nebula", 7, "hubble"],
        }));
        let elements = item.prompt_elements();
        assert_eq!(elements.keys(), vec!["title", "description", "subjects"]);
        match elements.get("description") {
            Some(PromptValue::Text(d)) => assert_eq!(d.chars().count(), 200),
            other => panic!("Expected text description, got: {:?}", other),
        }
        assert_eq!(
            elements.get("subjects").map(PromptValue::render),
            Some("nebula, hubble".to_string())
        );
    }

    #[test]
    fn archive_item_serializes_variant_fields_only() {
        let item: ArchiveItem = SpaceImageItem::from_api_response(&json!({
            "title": "Earthrise",
            "nasa_id": "as08-14-2383",
        }))
        .into();
        let value = serde_json::to_value(&item).unwrap();
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["date", "description", "keywords", "media_type", "nasa_id", "title"]
        );
        assert_eq!(item.title(), "Earthrise");
    }

    #[test]
    fn archive_item_round_trips_museum_variant() {
        let item: ArchiveItem = MuseumObjectItem::from_api_response(&museum_response()).into();
        let json = serde_json::to_string(&item).unwrap();
        let back: ArchiveItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
