//! SMTP delivery of notification emails via `lettre`.

use async_trait::async_trait;
use edutube_core::progress::Milestone;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{Notifier, NotifyError};

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `EMAIL_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@edutube.local";

/// Configuration for the SMTP notifier.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// SMTP server hostname.
    pub host: String,
    /// SMTP server port (defaults to 587).
    pub port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub user: Option<String>,
    /// Optional SMTP password.
    pub password: Option<String>,
}

impl MailerConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `EMAIL_HOST` is not set, signalling that email
    /// delivery is not configured and a no-op notifier should be used.
    ///
    /// | Variable      | Required | Default                  |
    /// |---------------|----------|--------------------------|
    /// | `EMAIL_HOST`  | yes      | --                       |
    /// | `EMAIL_PORT`  | no       | `587`                    |
    /// | `EMAIL_FROM`  | no       | `noreply@edutube.local`  |
    /// | `EMAIL_USER`  | no       | --                       |
    /// | `EMAIL_PASS`  | no       | --                       |
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("EMAIL_HOST").ok()?;
        Some(Self {
            host,
            port: std::env::var("EMAIL_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            user: std::env::var("EMAIL_USER").ok(),
            password: std::env::var("EMAIL_PASS").ok(),
        })
    }
}

/// Sends notification emails over SMTP.
pub struct SmtpNotifier {
    config: MailerConfig,
}

impl SmtpNotifier {
    pub fn new(config: MailerConfig) -> Self {
        Self { config }
    }

    async fn send(&self, to_email: &str, subject: String, body: String) -> Result<(), NotifyError> {
        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(to_email.parse()?)
            .subject(&subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| NotifyError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
                .port(self.config.port);

        if let (Some(user), Some(pass)) = (&self.config.user, &self.config.password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = to_email, subject, "Notification email sent");
        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_welcome(&self, to_email: &str, full_name: &str) -> Result<(), NotifyError> {
        let body = format!(
            "Welcome to EduTube AI, {full_name}!\n\n\
             We're excited to have you join our learning platform. Here's what you can do:\n\
             - Upload educational videos\n\
             - Learn with AI-powered features\n\
             - Take quizzes and track your progress\n\n\
             Get started by exploring our video library or uploading your first video!"
        );
        self.send(to_email, "Welcome to EduTube AI!".to_string(), body)
            .await
    }

    async fn send_milestone(
        &self,
        to_email: &str,
        full_name: &str,
        milestone: &Milestone,
    ) -> Result<(), NotifyError> {
        let body = format!(
            "Congratulations, {full_name}!\n\n\
             You've achieved a new learning milestone:\n\n\
             {}\n{}\n\n\
             Keep up the great work and continue your learning journey!",
            milestone.title, milestone.description
        );
        self.send(
            to_email,
            "Congratulations on Your Learning Milestone!".to_string(),
            body,
        )
        .await
    }
}
