// crates/muse-core/src/naming.rs
//
// Deterministic artifact naming: a save directory from the clock reading and
// a file stem from (time of day, item title). Runs in the same minute with
// the same title map to the same paths; the later write wins.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, TimeZone};
use regex::Regex;

use crate::time::TimeOfDay;

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("static pattern"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s").expect("static pattern"));

/// Suffix appended to the image stem for the metadata file.
pub const METADATA_SUFFIX: &str = "_metadata";

/// Filesystem-safe form of a title: drops everything except word characters,
/// whitespace and hyphens, trims, turns each whitespace character into `_`
/// and lowercases.
pub fn slug(title: &str) -> String {
    let cleaned = DISALLOWED.replace_all(title, "");
    WHITESPACE
        .replace_all(cleaned.trim(), "_")
        .to_lowercase()
}

/// File stem shared by an artifact's image and metadata files.
pub fn artifact_name(time_of_day: TimeOfDay, title: &str) -> String {
    format!("{}_{}", time_of_day, slug(title))
}

/// `{root}/{year}_{Mon}_{day}/{HH}_{MM}` for the given instant.
pub fn save_directory<Tz: TimeZone>(root: &Path, now: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    let day_dir = format!("{}_{}_{}", now.year(), now.format("%b"), now.day());
    root.join(day_dir).join(now.format("%H_%M").to_string())
}

/// Image and metadata paths for one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub image: PathBuf,
    pub metadata: PathBuf,
}

impl ArtifactPaths {
    /// Co-located `<name>.png` and `<name>_metadata.json` under `dir`.
    pub fn new(dir: &Path, name: &str) -> Self {
        Self {
            image: dir.join(format!("{}.png", name)),
            metadata: dir.join(format!("{}{}.json", name, METADATA_SUFFIX)),
        }
    }
}
