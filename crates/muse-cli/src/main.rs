// crates/muse-cli/src/main.rs
//
// Binary entrypoint for the archive-inspired art generator.
//
// Loads `.env` and the TOML configuration, initializes tracing, wires the
// archive sources and OpenAI client into a generation pipeline, runs it once
// and optionally mails the result.

mod config;
mod gate;

use std::sync::Arc;

use clap::Parser;
use config::{MuseConfig, SourceKind};
use gate::StdinGate;

use muse_core::ArchiveSource;
use muse_notify::{ArtMailer, Notifier};
use muse_openai::OpenAiClient;
use muse_pipeline::{GenerationPipeline, PromptBuilder};
use muse_sources::{MuseumSource, SpaceImageSource};

/// Generate one artwork inspired by a random archive item.
#[derive(Parser, Debug)]
#[command(name = "muse", version = "0.1.0", about = "Archive-inspired AI art generator")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "muse.toml")]
    config: String,

    /// Archive to draw from; repeat to set a fallback order.
    #[arg(long = "source", value_enum)]
    sources: Vec<SourceKind>,

    /// Root directory for generated artifacts.
    #[arg(long)]
    data_dir: Option<String>,

    /// Mail the artifact after a successful run.
    #[arg(long)]
    notify: bool,

    /// Pause after fetching the item, before any paid request.
    #[arg(long)]
    debug_pause: bool,
}

impl Args {
    /// CLI flags override file and environment values.
    fn apply(&self, config: &mut MuseConfig) {
        if !self.sources.is_empty() {
            config.sources = self.sources.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if self.notify {
            config.notify.enabled = true;
        }
        if self.debug_pause {
            config.debug_pause = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();
    let args = Args::parse();

    let loaded = MuseConfig::load(&args.config);
    let mut config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => MuseConfig::default(),
    };
    config.apply_env(|key| std::env::var(key).ok());
    args.apply(&mut config);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    match &loaded {
        Ok(_) => tracing::info!("Loaded configuration from {}", args.config),
        Err(e) => tracing::warn!(
            "Could not load config from {}: {}. Using defaults.",
            args.config,
            e
        ),
    }
    if let Ok(path) = &dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let api_key = config
        .openai
        .api_key
        .clone()
        .ok_or("OpenAI API key not found. Set OPENAI_API_KEY in the environment or .env")?;
    let openai = Arc::new(OpenAiClient::new(&config.openai.base_url, &api_key)?);

    let sources = build_sources(&config);
    tracing::info!(
        "Sources: {:?}; data directory: {}",
        config.sources,
        config.data_dir
    );

    let prompts = PromptBuilder::new(openai.clone()).with_settings(config.prompt_settings());
    let mut pipeline =
        GenerationPipeline::new(sources, prompts, openai, config.pipeline_settings());
    if config.debug_pause {
        tracing::info!("Debug pause enabled");
        pipeline = pipeline.with_debug_gate(Arc::new(StdinGate::new()));
    }

    tokio::select! {
        artifact = pipeline.generate() => match artifact {
            Some(artifact) => {
                println!("Generated: {}", artifact.image_path.display());
                println!("Metadata: {}", artifact.metadata_path.display());

                if config.notify.enabled {
                    let mailer = ArtMailer::new(config.mail_settings());
                    if mailer.send_art(&artifact.image_path, &artifact.metadata_path).await {
                        println!("Email sent");
                    } else {
                        println!("Email not sent");
                    }
                }
            }
            None => println!("Generation attempt failed."),
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping");
        }
    }

    Ok(())
}

fn build_sources(config: &MuseConfig) -> Vec<Arc<dyn ArchiveSource>> {
    config
        .sources
        .iter()
        .map(|kind| -> Arc<dyn ArchiveSource> {
            match kind {
                SourceKind::Museum => Arc::new(MuseumSource::new(&config.archives.museum_base_url)),
                SourceKind::Space => {
                    Arc::new(SpaceImageSource::new(&config.archives.space_base_url))
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_configuration() {
        let args = Args::try_parse_from([
            "muse",
            "--source",
            "space",
            "--source",
            "museum",
            "--data-dir",
            "/tmp/art",
            "--notify",
        ])
        .unwrap();
        let mut config = MuseConfig::default();
        args.apply(&mut config);

        assert_eq!(config.sources, vec![SourceKind::Space, SourceKind::Museum]);
        assert_eq!(config.data_dir, "/tmp/art");
        assert!(config.notify.enabled);
        assert!(!config.debug_pause);
    }

    #[test]
    fn absent_flags_keep_configuration() {
        let args = Args::try_parse_from(["muse"]).unwrap();
        let mut config = MuseConfig::default();
        config.sources = vec![SourceKind::Space];
        config.debug_pause = true;
        args.apply(&mut config);

        assert_eq!(config.sources, vec![SourceKind::Space]);
        assert!(config.debug_pause);
        assert_eq!(args.config, "muse.toml");
    }

    #[test]
    fn sources_follow_configured_order() {
        let mut config = MuseConfig::default();
        config.sources = vec![SourceKind::Space, SourceKind::Museum];
        let names: Vec<&str> = build_sources(&config).iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["space", "museum"]);
    }
}
