// crates/muse-core/src/metadata.rs

use serde::{Deserialize, Serialize};

use crate::item::ArchiveItem;
use crate::time::TimeOfDay;

/// Persisted record describing one artifact. Written next to the image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Seconds since the Unix epoch, stored as a decimal string.
    pub timestamp: String,
    /// The full field set of the item the prompt was derived from.
    pub archive_data: ArchiveItem,
    pub prompt: String,
    pub environmental_factors: EnvironmentalFactors,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentalFactors {
    pub time_of_day: TimeOfDay,
}

impl MetadataRecord {
    pub fn new(
        item: ArchiveItem,
        prompt: impl Into<String>,
        time_of_day: TimeOfDay,
        unix_seconds: i64,
    ) -> Self {
        Self {
            timestamp: unix_seconds.to_string(),
            archive_data: item,
            prompt: prompt.into(),
            environmental_factors: EnvironmentalFactors { time_of_day },
        }
    }

    /// Pretty-printed JSON, as written to disk.
    pub fn to_pretty_json(&self) -> Result<String, crate::MuseError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
