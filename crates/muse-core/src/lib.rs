// crates/muse-core/src/lib.rs
//
// muse-core: Core types, traits, and naming rules for the Muse generator.
//
// This is the leaf crate every other crate in the workspace depends on. It
// defines the normalized archive records, the metadata schema, the
// time-of-day and naming rules, the shared error type, and the trait
// interfaces for archives, completion and image synthesis.

pub mod error;
pub mod item;
pub mod metadata;
pub mod naming;
pub mod request;
pub mod time;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use muse_core::ArchiveItem;`

pub use error::MuseError;
pub use item::{ArchiveItem, MuseumObjectItem, PromptElements, PromptValue, SpaceImageItem};
pub use metadata::{EnvironmentalFactors, MetadataRecord};
pub use naming::{artifact_name, save_directory, slug, ArtifactPaths};
pub use request::{CompletionRequest, ImageRequest};
pub use time::{Clock, FixedClock, SystemClock, TimeOfDay};
pub use traits::{ArchiveSource, CompletionService, ImageSynthesisService};

#[cfg(feature = "test-util")]
pub mod mock_http;
