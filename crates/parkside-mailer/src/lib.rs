//! Outbound email for inquiry notifications.
//!
//! The production transport POSTs the message to an HTTP mail API (a local
//! Mailpit in dev, a hosted relay in prod). Handlers talk to the [`Mailer`]
//! trait so tests can swap in [`RecordingMailer`].

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("mail transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail API rejected the message with status {0}")]
    Rejected(u16),
}

#[derive(Debug, Clone, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailerError>;
}

pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
}

impl HttpMailer {
    pub fn new(endpoint: String, api_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_token,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailerError> {
        let mut request = self.client.post(&self.endpoint).json(email);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(MailerError::Rejected(response.status().as_u16()));
        }

        debug!(to = ?email.to, subject = %email.subject, "mail dispatched");
        Ok(())
    }
}

/// Captures messages instead of sending them. Test double.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutboundEmail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailerError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email.clone());
        }
        Ok(())
    }
}
