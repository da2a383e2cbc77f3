// crates/muse-openai/src/lib.rs
//
// muse-openai: HTTP client for an OpenAI-compatible API, implementing the
// muse-core completion and image-synthesis traits.

pub mod client;
pub mod wire;

pub use client::OpenAiClient;
