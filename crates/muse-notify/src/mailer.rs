// crates/muse-notify/src/mailer.rs
//
// Delivery of a composed artifact message over authenticated SMTP (Gmail by
// default, with an app password). Message construction is separate from the
// transport so it can be checked without a mail server.

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use muse_core::MuseError;

use crate::compose::compose_body;

/// Subject line of every artifact message.
pub const SUBJECT: &str = "Your Daily AI Art";

/// SMTP relay used when none is configured.
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Consumes a finished artifact. Implementations report success as a boolean
/// and never propagate failures.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_art(&self, image_path: &Path, metadata_path: &Path) -> bool;
}

/// Where and to whom artifact messages are sent.
#[derive(Clone)]
pub struct MailSettings {
    /// SMTP relay host; the connection uses implicit TLS.
    pub smtp_host: String,
    /// Sender address, also the SMTP login.
    pub sender: Option<String>,
    pub app_password: Option<String>,
    pub recipients: Vec<String>,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            sender: None,
            app_password: None,
            recipients: Vec::new(),
        }
    }
}

impl fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailSettings")
            .field("smtp_host", &self.smtp_host)
            .field("sender", &self.sender)
            .field("app_password", &self.app_password.as_ref().map(|_| "<redacted>"))
            .field("recipients", &self.recipients)
            .finish()
    }
}

impl MailSettings {
    /// True when a host, a sender, an app password and at least one
    /// recipient are set.
    pub fn is_configured(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        !self.smtp_host.trim().is_empty()
            && filled(&self.sender)
            && filled(&self.app_password)
            && self.recipients.iter().any(|r| !r.trim().is_empty())
    }

    /// Split a comma-separated recipient list, dropping blanks.
    pub fn parse_recipients(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Build the artifact message: plain-text body plus the image as a PNG
/// attachment, addressed from the sender to every recipient.
pub fn build_message(
    settings: &MailSettings,
    body: String,
    image_name: &str,
    image: Vec<u8>,
) -> Result<Message, MuseError> {
    let sender = settings.sender.as_deref().unwrap_or_default().trim();
    let from: Mailbox = sender
        .parse()
        .map_err(|e| MuseError::Notification(format!("Invalid sender '{}': {}", sender, e)))?;

    let mut builder = Message::builder().from(from).subject(SUBJECT);
    for recipient in settings.recipients.iter().map(|r| r.trim()).filter(|r| !r.is_empty()) {
        let to: Mailbox = recipient.parse().map_err(|e| {
            MuseError::Notification(format!("Invalid recipient '{}': {}", recipient, e))
        })?;
        builder = builder.to(to);
    }

    let png = ContentType::parse("image/png")
        .map_err(|e| MuseError::Notification(format!("Invalid attachment type: {}", e)))?;

    builder
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(body))
                .singlepart(Attachment::new(image_name.to_string()).body(image, png)),
        )
        .map_err(|e| MuseError::Notification(format!("Failed to build message: {}", e)))
}

/// Mails artifacts through the configured SMTP relay.
#[derive(Debug, Clone)]
pub struct ArtMailer {
    settings: MailSettings,
}

impl ArtMailer {
    pub fn new(settings: MailSettings) -> Self {
        Self { settings }
    }

    pub fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }

    /// Read the artifact and compose its message.
    pub async fn compose_message(
        &self,
        image_path: &Path,
        metadata_path: &Path,
    ) -> Result<Message, MuseError> {
        let body = compose_body(metadata_path).await;
        let image = tokio::fs::read(image_path).await.map_err(|e| {
            MuseError::Notification(format!("Failed to read {}: {}", image_path.display(), e))
        })?;
        let file_name = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "art.png".to_string());

        build_message(&self.settings, body, &file_name, image)
    }

    async fn deliver(&self, message: Message) -> Result<(), MuseError> {
        let credentials = Credentials::new(
            self.settings.sender.clone().unwrap_or_default(),
            self.settings.app_password.clone().unwrap_or_default(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.settings.smtp_host)
            .map_err(|e| {
                MuseError::Notification(format!(
                    "Invalid SMTP relay {}: {}",
                    self.settings.smtp_host, e
                ))
            })?
            .credentials(credentials)
            .build();

        transport
            .send(message)
            .await
            .map_err(|e| MuseError::Notification(format!("SMTP delivery failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for ArtMailer {
    async fn send_art(&self, image_path: &Path, metadata_path: &Path) -> bool {
        if !self.is_configured() {
            tracing::warn!("Email not configured, skipping send");
            return false;
        }

        let result = match self.compose_message(image_path, metadata_path).await {
            Ok(message) => self.deliver(message).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                tracing::info!(
                    "Sent {} to {} recipient(s)",
                    image_path.display(),
                    self.settings.recipients.len()
                );
                true
            }
            Err(e) => {
                tracing::error!("Failed to send email: {}", e);
                false
            }
        }
    }
}
