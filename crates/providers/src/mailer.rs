//! SMTP delivery of plain-text notifications.

use crate::{Notifier, OutgoingEmail, ProviderError};
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::info;

#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Sends mail through an authenticated relay using implicit TLS.
#[derive(Clone, Debug)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(cfg: SmtpConfig) -> Result<Self, ProviderError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.host)
            .map_err(|e| ProviderError::Mail(e.to_string()))?
            .port(cfg.port)
            .credentials(Credentials::new(cfg.username, cfg.password))
            .build();
        Ok(Self { transport })
    }
}

#[async_trait::async_trait]
impl Notifier for SmtpMailer {
    async fn send_email(&self, email: &OutgoingEmail) -> Result<(), ProviderError> {
        let message = build_message(email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| ProviderError::Mail(e.to_string()))?;
        info!(recipients = email.to.len(), subject = %email.subject, "mail sent");
        Ok(())
    }
}

pub fn build_message(email: &OutgoingEmail) -> Result<Message, ProviderError> {
    if email.to.is_empty() {
        return Err(ProviderError::InvalidAddress("no recipients".into()));
    }
    let mut builder = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_PLAIN);
    for to in &email.to {
        builder = builder.to(parse_mailbox(to)?);
    }
    builder
        .body(email.body.clone())
        .map_err(|e| ProviderError::Mail(e.to_string()))
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, ProviderError> {
    raw.trim()
        .parse::<Mailbox>()
        .map_err(|e| ProviderError::InvalidAddress(format!("{raw}: {e}")))
}
