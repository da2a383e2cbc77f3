// crates/muse-sources/src/http.rs
//
// Session setup shared by the archive sources.

use muse_core::MuseError;

/// Identifying User-Agent sent with every archive request.
pub const ARCHIVE_USER_AGENT: &str = "Mozilla/5.0";

/// Open a fresh HTTP session for one fetch. The session is dropped when the
/// fetch returns, on every exit path.
pub fn archive_session() -> Result<reqwest::Client, MuseError> {
    reqwest::Client::builder()
        .user_agent(ARCHIVE_USER_AGENT)
        .build()
        .map_err(|e| MuseError::Network(format!("Failed to build HTTP client: {}", e)))
}
