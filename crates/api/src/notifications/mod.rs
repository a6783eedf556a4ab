//! Outbound email notifications.
//!
//! [`Notifier`] is the delivery seam: handlers fire welcome and milestone
//! emails through it and log failures without surfacing them to the client.
//! [`SmtpNotifier`] delivers over SMTP; [`NoopNotifier`] stands in when no
//! mail host is configured.

pub mod mailer;

use async_trait::async_trait;
use edutube_core::progress::Milestone;

pub use mailer::{MailerConfig, SmtpNotifier};

/// Errors from notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

/// Delivery seam for user-facing notification emails.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Greet a freshly registered user.
    async fn send_welcome(&self, to_email: &str, full_name: &str) -> Result<(), NotifyError>;

    /// Congratulate a user on a learning milestone.
    async fn send_milestone(
        &self,
        to_email: &str,
        full_name: &str,
        milestone: &Milestone,
    ) -> Result<(), NotifyError>;
}

/// Notifier used when no mail host is configured; logs instead of sending.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send_welcome(&self, to_email: &str, _full_name: &str) -> Result<(), NotifyError> {
        tracing::debug!(to = to_email, "email not configured, skipping welcome email");
        Ok(())
    }

    async fn send_milestone(
        &self,
        to_email: &str,
        _full_name: &str,
        milestone: &Milestone,
    ) -> Result<(), NotifyError> {
        tracing::debug!(
            to = to_email,
            milestone = milestone.title,
            "email not configured, skipping milestone email"
        );
        Ok(())
    }
}
