// crates/muse-notify/src/lib.rs
//
// muse-notify: sends a finished artifact to a list of recipients.
//
// The message body is composed from the artifact's metadata file; delivery
// goes through authenticated SMTP. Delivery never fails loudly: callers get a
// boolean and the reason is logged.

pub mod compose;
pub mod mailer;

pub use compose::{compose_body, compose_body_from, FALLBACK_BODY};
pub use mailer::{build_message, ArtMailer, MailSettings, Notifier, DEFAULT_SMTP_HOST, SUBJECT};
