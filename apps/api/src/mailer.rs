//! Outbound transactional email.
//!
//! Handlers talk to the `Mailer` port; the production implementation relays
//! through SMTP via lettre's tokio transport.

use async_trait::async_trait;
use lettre::message::MultiPart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport unavailable: {0}")]
    Transport(String),
    #[error("invalid outbound message: {0}")]
    Message(String),
}

/// A fully-rendered outbound message.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Outbound mail port. On success returns the provider message id when the
/// transport reports one.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> Result<Option<String>, MailError>;
}

/// SMTP mailer over a STARTTLS relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let credentials = Credentials::new(config.smtp_user.clone(), config.smtp_pass.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)?
            .credentials(credentials)
            .build();
        Ok(Self {
            transport,
            from: config.from_email.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutboundEmail) -> Result<Option<String>, MailError> {
        let message = Message::builder()
            .from(self
                .from
                .parse()
                .map_err(|e| MailError::Message(format!("bad sender address: {e}")))?)
            .to(email
                .to
                .parse()
                .map_err(|e| MailError::Message(format!("bad recipient address: {e}")))?)
            .subject(email.subject)
            .multipart(MultiPart::alternative_plain_html(email.text, email.html))
            .map_err(|e| MailError::Message(e.to_string()))?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(response.first_line().map(str::to_string))
    }
}

/// Mailer double that records every message, for tests.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingMailer {
    sent: std::sync::Mutex<Vec<OutboundEmail>>,
}

#[cfg(test)]
impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutboundEmail) -> Result<Option<String>, MailError> {
        self.sent.lock().expect("mailer mutex poisoned").push(email);
        Ok(Some("250 queued".to_string()))
    }
}

/// Mailer double whose transport is always down, for caveat-path tests.
#[cfg(test)]
pub struct FailingMailer;

#[cfg(test)]
#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _email: OutboundEmail) -> Result<Option<String>, MailError> {
        Err(MailError::Transport("smtp relay offline".to_string()))
    }
}
