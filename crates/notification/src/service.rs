//! Email notification service using lettre

use async_trait::async_trait;
use lettre::{
    Message, SmtpTransport, Transport,
    message::MultiPart,
    transport::smtp::authentication::Credentials,
};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: String,
    #[serde(default)]
    pub smtp_password: String,
    /// Sender address, the SMTP username when blank.
    #[serde(default)]
    pub from_address: String,
    #[serde(default)]
    pub recipient: String,
    /// Comma separated.
    #[serde(default)]
    pub additional_recipients: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: String::new(),
            recipient: String::new(),
            additional_recipients: String::new(),
        }
    }
}

impl EmailConfig {
    pub fn sender(&self) -> &str {
        if self.from_address.trim().is_empty() {
            self.smtp_username.trim()
        } else {
            self.from_address.trim()
        }
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

/// A rendered message, identical for every recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub subject: String,
    pub html: String,
    pub plain: String,
}

/// Delivers one message to one address.
#[async_trait]
pub trait Outbox: Send + Sync {
    async fn deliver(&self, to: &str, email: &Email) -> anyhow::Result<()>;
}

/// Email service for sending notifications
#[derive(Clone)]
pub struct EmailService {
    mailer: SmtpTransport,
    from: String,
}

impl EmailService {
    /// Create a new email service from configuration
    pub fn new(config: &EmailConfig) -> anyhow::Result<Self> {
        let mailer = if config.smtp_username.is_empty() || config.smtp_password.is_empty() {
            tracing::info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                "SMTP credentials not configured, using unauthenticated connection (e.g., MailDev)"
            );
            SmtpTransport::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        } else {
            tracing::info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                "Email service initialized with authentication and STARTTLS"
            );

            let creds =
                Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

            SmtpTransport::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port)
                .credentials(creds)
                .build()
        };

        Ok(Self {
            mailer,
            from: config.sender().to_owned(),
        })
    }
}

#[async_trait]
impl Outbox for EmailService {
    #[tracing::instrument(skip(self, email), fields(subject = %email.subject))]
    async fn deliver(&self, to: &str, email: &Email) -> anyhow::Result<()> {
        tracing::info!("Sending email");

        let message = Message::builder()
            .from(self.from.parse()?)
            .to(to.parse()?)
            .subject(email.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                email.plain.clone(),
                email.html.clone(),
            ))?;

        self.mailer.send(&message)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_falls_back_to_username() {
        let mut config = EmailConfig {
            smtp_username: "menus@example.com".to_owned(),
            ..Default::default()
        };
        assert_eq!(config.sender(), "menus@example.com");

        config.from_address = "Lunch Bot <lunch@example.com>".to_owned();
        assert_eq!(config.sender(), "Lunch Bot <lunch@example.com>");
    }

    #[test]
    fn test_unauthenticated_service_builds() {
        let config = EmailConfig {
            smtp_host: "localhost".to_owned(),
            smtp_port: 1025,
            from_address: "menus@example.com".to_owned(),
            ..Default::default()
        };

        assert!(EmailService::new(&config).is_ok());
    }
}
