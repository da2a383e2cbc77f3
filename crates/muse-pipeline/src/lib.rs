// crates/muse-pipeline/src/lib.rs
//
// muse-pipeline: turns one archive item into a saved artifact.
//
// `PromptBuilder` asks a completion service for an image prompt (with a
// templated fallback), and `GenerationPipeline` runs the fetch → prompt →
// synthesize → persist sequence on a single task.

pub mod pipeline;
pub mod prompt;

pub use pipeline::{Artifact, DebugGate, GenerationPipeline, PipelineSettings, Stage, StageFailure};
pub use prompt::{fallback_prompt, PromptBuilder, PromptSettings};
