// crates/muse-cli/src/config.rs
//
// Runtime configuration for the generator. Loaded once at start-up from a
// TOML file (or defaults), then overlaid with environment values. Library
// crates receive the pieces they need from here and never read the
// environment themselves.

use serde::Deserialize;
use std::fs;

use muse_notify::{MailSettings, DEFAULT_SMTP_HOST};
use muse_openai::OpenAiClient;
use muse_pipeline::{PipelineSettings, PromptSettings};
use muse_sources::{MuseumSource, SpaceImageSource};

/// Archive a run may draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Museum,
    Space,
}

/// Runtime configuration for one generator run.
#[derive(Debug, Clone, Deserialize)]
pub struct MuseConfig {
    /// Root directory for generated artifacts.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Archives to try, in order; the first that yields an item is used.
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceKind>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Wait for Enter after an item is fetched, before any paid API call.
    #[serde(default)]
    pub debug_pause: bool,

    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub archives: ArchiveConfig,

    #[serde(default)]
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Usually supplied through `OPENAI_API_KEY` rather than the file.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_completion_model")]
    pub completion_model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_image_model")]
    pub image_model: String,

    #[serde(default = "default_image_size")]
    pub image_size: String,

    #[serde(default = "default_image_quality")]
    pub image_quality: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    #[serde(default = "default_museum_base_url")]
    pub museum_base_url: String,

    #[serde(default = "default_space_base_url")]
    pub space_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    /// Send the artifact after a successful run.
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// Sender address, also used as the SMTP login.
    #[serde(default)]
    pub sender: Option<String>,

    /// Usually supplied through `GMAIL_APP_PASSWORD` rather than the file.
    #[serde(default)]
    pub app_password: Option<String>,

    #[serde(default)]
    pub recipients: Vec<String>,
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_sources() -> Vec<SourceKind> {
    vec![SourceKind::Museum]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_openai_base_url() -> String {
    OpenAiClient::DEFAULT_BASE_URL.to_string()
}

fn default_completion_model() -> String {
    PromptSettings::default().model
}

fn default_max_tokens() -> u32 {
    PromptSettings::default().max_tokens
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

fn default_image_quality() -> String {
    "standard".to_string()
}

fn default_smtp_host() -> String {
    DEFAULT_SMTP_HOST.to_string()
}

fn default_museum_base_url() -> String {
    MuseumSource::DEFAULT_BASE_URL.to_string()
}

fn default_space_base_url() -> String {
    SpaceImageSource::DEFAULT_BASE_URL.to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            api_key: None,
            completion_model: default_completion_model(),
            max_tokens: default_max_tokens(),
            image_model: default_image_model(),
            image_size: default_image_size(),
            image_quality: default_image_quality(),
        }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            museum_base_url: default_museum_base_url(),
            space_base_url: default_space_base_url(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: default_smtp_host(),
            sender: None,
            app_password: None,
            recipients: Vec::new(),
        }
    }
}

impl Default for MuseConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            sources: default_sources(),
            log_level: default_log_level(),
            debug_pause: false,
            openai: OpenAiConfig::default(),
            archives: ArchiveConfig::default(),
            notify: NotifyConfig::default(),
        }
    }
}

impl MuseConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: MuseConfig = toml::from_str(contents)?;
        if config.sources.is_empty() {
            return Err("`sources` must name at least one archive (museum, space)".into());
        }
        Ok(config)
    }

    /// Overlay values from the environment. `lookup` is `std::env::var` in
    /// the binary and a map in tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.openai.api_key = Some(key);
        }
        if let Some(flag) = lookup("DEBUG_MODE") {
            self.debug_pause = parse_flag(&flag);
        }
        if let Some(flag) = lookup("SEND_EMAIL") {
            self.notify.enabled = parse_flag(&flag);
        }
        if let Some(host) = lookup("SMTP_HOST").filter(|h| !h.trim().is_empty()) {
            self.notify.smtp_host = host;
        }
        if let Some(sender) = lookup("GMAIL_SENDER") {
            self.notify.sender = Some(sender);
        }
        if let Some(password) = lookup("GMAIL_APP_PASSWORD") {
            self.notify.app_password = Some(password);
        }
        if let Some(raw) = lookup("EMAIL_RECIPIENTS") {
            self.notify.recipients = MailSettings::parse_recipients(&raw);
        }
    }

    pub fn prompt_settings(&self) -> PromptSettings {
        PromptSettings {
            model: self.openai.completion_model.clone(),
            max_tokens: self.openai.max_tokens,
        }
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            data_dir: expand_tilde(&self.data_dir).into(),
            image_model: self.openai.image_model.clone(),
            image_size: self.openai.image_size.clone(),
            image_quality: self.openai.image_quality.clone(),
        }
    }

    pub fn mail_settings(&self) -> MailSettings {
        MailSettings {
            smtp_host: self.notify.smtp_host.clone(),
            sender: self.notify.sender.clone(),
            app_password: self.notify.app_password.clone(),
            recipients: self.notify.recipients.clone(),
        }
    }
}

/// "true", "1" and "yes" (any case) enable a flag; anything else disables it.
fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

/// Expand `~` at the start of a path to the user's home directory.
fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{}", home.display(), rest);
        }
    }
    path.to_string()
}
