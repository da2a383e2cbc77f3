// crates/muse-sources/src/lib.rs
//
// muse-sources: Archive sources for the Muse generator.
//
// Each source queries one public archive API over a short-lived HTTP session
// and normalizes a single randomly chosen record into a muse-core
// `ArchiveItem`.

pub mod http;
pub mod museum;
pub mod space;

pub use museum::MuseumSource;
pub use space::SpaceImageSource;
