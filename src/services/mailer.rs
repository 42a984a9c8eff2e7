//! Outbound mail transports.
//!
//! The transport is built once at startup from [`MailConfig`] and shared as
//! `Arc<dyn MailTransport>`; the dispatch service never constructs one itself.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{MailBackend, MailConfig};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("{0}")]
    Transport(String),
}

/// A fully rendered message for one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl OutgoingMail {
    fn mailbox(address: &str) -> Result<Mailbox, MailError> {
        address
            .trim()
            .parse::<Mailbox>()
            .map_err(|e| MailError::InvalidAddress {
                address: address.to_string(),
                reason: e.to_string(),
            })
    }

    /// Check both addresses without building the message.
    pub fn validate(&self) -> Result<(), MailError> {
        Self::mailbox(&self.from)?;
        Self::mailbox(&self.to)?;
        Ok(())
    }

    /// `multipart/alternative` with a plain-text and an HTML part.
    pub fn to_message(&self) -> Result<Message, MailError> {
        Message::builder()
            .from(Self::mailbox(&self.from)?)
            .to(Self::mailbox(&self.to)?)
            .subject(self.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                self.text.clone(),
                self.html.clone(),
            ))
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;

    /// Probe the backend. `Ok(false)` means reachable but not accepting.
    async fn verify(&self) -> Result<bool, MailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
    port: u16,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let tls_parameters = TlsParameters::builder(config.host.clone())
            .dangerous_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| MailError::Transport(format!("TLS parameters error: {e}")))?;

        let tls = if config.secure {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Opportunistic(tls_parameters)
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .tls(tls)
            .timeout(Some(Duration::from_secs(config.timeout_seconds)));

        if let Some(username) = config.username.as_deref().filter(|u| !u.is_empty()) {
            builder = builder.credentials(Credentials::new(
                username.to_string(),
                config.password.clone().unwrap_or_default(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            host: config.host.clone(),
            port: config.port,
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = mail.to_message()?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        debug!(
            host = %self.host,
            port = self.port,
            to = %mail.to,
            code = %response.code(),
            "SMTP accepted message"
        );
        Ok(())
    }

    async fn verify(&self) -> Result<bool, MailError> {
        self.transport
            .test_connection()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))
    }
}

/// Logs each message instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct ConsoleMailer;

#[async_trait]
impl MailTransport for ConsoleMailer {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        mail.validate()?;

        info!(
            from = %mail.from,
            to = %mail.to,
            subject = %mail.subject,
            bytes = mail.html.len(),
            "Console email sent"
        );
        debug!(body = %mail.text, "Console email body");
        Ok(())
    }

    async fn verify(&self) -> Result<bool, MailError> {
        Ok(true)
    }
}

/// Build the configured transport.
pub fn build_transport(config: &MailConfig) -> anyhow::Result<Arc<dyn MailTransport>> {
    let transport: Arc<dyn MailTransport> = match config.backend {
        MailBackend::Smtp => {
            if config.host.trim().is_empty() {
                anyhow::bail!("mail.host is required for the smtp backend");
            }
            Arc::new(SmtpMailer::new(config)?)
        }
        MailBackend::Console => Arc::new(ConsoleMailer),
    };

    Ok(transport)
}
