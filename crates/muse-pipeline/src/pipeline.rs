// crates/muse-pipeline/src/pipeline.rs
//
// The generation pipeline: one strictly sequential run from archive item to
// saved artifact. Every stage failure ends the run; `generate` logs it and
// reports an absent result rather than returning the error.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use muse_core::{
    artifact_name, save_directory, ArchiveItem, ArchiveSource, ArtifactPaths, Clock,
    ImageRequest, ImageSynthesisService, MetadataRecord, MuseError, SystemClock, TimeOfDay,
};

use crate::prompt::PromptBuilder;

/// Paths of one saved artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub image_path: PathBuf,
    pub metadata_path: PathBuf,
}

/// Output location and image-synthesis parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Root under which dated artifact directories are created.
    pub data_dir: PathBuf,
    pub image_model: String,
    pub image_size: String,
    pub image_quality: String,
}

impl PipelineSettings {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            image_model: "dall-e-3".to_string(),
            image_size: "1024x1024".to_string(),
            image_quality: "standard".to_string(),
        }
    }
}

/// Operator checkpoint awaited after an item is fetched, before any prompt or
/// image is requested.
#[async_trait]
pub trait DebugGate: Send + Sync {
    async fn wait(&self, item: &ArchiveItem);
}

/// Pipeline stages, used to label failures in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchItem,
    SynthesizeImage,
    PrepareDirectory,
    PersistImage,
    WriteMetadata,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::FetchItem => "fetch_item",
            Stage::SynthesizeImage => "synthesize_image",
            Stage::PrepareDirectory => "prepare_directory",
            Stage::PersistImage => "persist_image",
            Stage::WriteMetadata => "write_metadata",
        };
        f.write_str(name)
    }
}

/// A failed run: the stage it stopped at and why.
#[derive(Debug)]
pub struct StageFailure {
    pub stage: Stage,
    pub error: MuseError,
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage {} failed: {}", self.stage, self.error)
    }
}

trait AtStage<T> {
    fn at(self, stage: Stage) -> Result<T, StageFailure>;
}

impl<T> AtStage<T> for Result<T, MuseError> {
    fn at(self, stage: Stage) -> Result<T, StageFailure> {
        self.map_err(|error| StageFailure { stage, error })
    }
}

/// Sequential fetch → prompt → synthesize → persist pipeline.
pub struct GenerationPipeline {
    /// Tried in order; the first one to return an item is used.
    sources: Vec<Arc<dyn ArchiveSource>>,
    prompts: PromptBuilder,
    images: Arc<dyn ImageSynthesisService>,
    settings: PipelineSettings,
    clock: Arc<dyn Clock>,
    gate: Option<Arc<dyn DebugGate>>,
}

impl GenerationPipeline {
    pub fn new(
        sources: Vec<Arc<dyn ArchiveSource>>,
        prompts: PromptBuilder,
        images: Arc<dyn ImageSynthesisService>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            sources,
            prompts,
            images,
            settings,
            clock: Arc::new(SystemClock),
            gate: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_debug_gate(mut self, gate: Arc<dyn DebugGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Run once. Returns the artifact paths, or `None` after logging the
    /// stage that failed.
    pub async fn generate(&self) -> Option<Artifact> {
        match self.run().await {
            Ok(artifact) => Some(artifact),
            Err(failure) => {
                tracing::error!("Generation failed: {}", failure);
                None
            }
        }
    }

    /// Run once, reporting which stage failed.
    pub async fn run(&self) -> Result<Artifact, StageFailure> {
        let item = self.fetch_item().await.at(Stage::FetchItem)?;
        tracing::info!("Retrieved item: {}", item.title());

        if let Some(gate) = &self.gate {
            gate.wait(&item).await;
        }

        let now = self.clock.now();
        let time_of_day = TimeOfDay::at(&now);

        let prompt = self.prompts.build(&item, time_of_day).await;
        tracing::info!("Generating with prompt: {}", prompt);

        let image_url = self.synthesize(&prompt).await.at(Stage::SynthesizeImage)?;

        let dir = save_directory(&self.settings.data_dir, &now);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| {
                MuseError::Persistence(format!("Failed to create {}: {}", dir.display(), e))
            })
            .at(Stage::PrepareDirectory)?;
        let paths = ArtifactPaths::new(&dir, &artifact_name(time_of_day, item.title()));

        let bytes = download_image(&image_url).await.at(Stage::PersistImage)?;
        write_file(&paths.image, &bytes)
            .await
            .at(Stage::PersistImage)?;

        let record = MetadataRecord::new(item, prompt, time_of_day, now.timestamp());
        let json = record.to_pretty_json().at(Stage::WriteMetadata)?;
        write_file(&paths.metadata, json.as_bytes())
            .await
            .at(Stage::WriteMetadata)?;

        tracing::info!("Saved artifact {}", paths.image.display());
        Ok(Artifact {
            image_path: paths.image,
            metadata_path: paths.metadata,
        })
    }

    async fn fetch_item(&self) -> Result<ArchiveItem, MuseError> {
        for source in &self.sources {
            if let Some(item) = source.get_random_item().await {
                return Ok(item);
            }
            tracing::warn!("Source '{}' produced no item", source.name());
        }
        Err(MuseError::SourceUnavailable(format!(
            "No item retrieved from {} configured source(s)",
            self.sources.len()
        )))
    }

    async fn synthesize(&self, prompt: &str) -> Result<String, MuseError> {
        let request = ImageRequest {
            model: self.settings.image_model.clone(),
            prompt: prompt.to_string(),
            size: self.settings.image_size.clone(),
            quality: self.settings.image_quality.clone(),
            n: 1,
        };
        self.images.synthesize(&request).await?.ok_or_else(|| {
            MuseError::Synthesis("No valid image in synthesis response".to_string())
        })
    }
}

/// Fetch the generated image over a fresh HTTP session.
async fn download_image(url: &str) -> Result<Vec<u8>, MuseError> {
    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| MuseError::Persistence(format!("Image download request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(MuseError::Persistence(format!(
            "Failed to download image: HTTP {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| MuseError::Persistence(format!("Image download body read failed: {}", e)))?;
    Ok(bytes.to_vec())
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), MuseError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| MuseError::Persistence(format!("Failed to write {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_synthesis_defaults() {
        let settings = PipelineSettings::new("data");
        assert_eq!(settings.data_dir, PathBuf::from("data"));
        assert_eq!(settings.image_model, "dall-e-3");
        assert_eq!(settings.image_size, "1024x1024");
        assert_eq!(settings.image_quality, "standard");
    }

    #[test]
    fn stage_failure_names_the_stage() {
        let failure =
            Err::<(), _>(MuseError::Synthesis("empty".to_string())).at(Stage::SynthesizeImage);
        let text = failure.unwrap_err().to_string();
        assert_eq!(text, "stage synthesize_image failed: Synthesis error: empty");
    }
}
