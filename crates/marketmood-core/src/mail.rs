//! SMTP report delivery.
//!
//! Delivery sits behind the [`MailTransport`] trait so the dispatch path can
//! be exercised offline with [`RecordingMailer`]. The production
//! [`SmtpMailer`] speaks implicit-TLS SMTP (port 465 by default) via lettre.
//! Delivery runs after the report has been rendered and printed; a failure
//! here never invalidates the computed report.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::info;

use crate::config::MailConfig;

/// Delivery errors, all operator-visible and none fatal to the run.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("missing email credentials: {}", missing.join(", "))]
    IncompleteCredentials { missing: Vec<&'static str> },

    #[error("invalid mailbox '{address}': {reason}")]
    InvalidMailbox { address: String, reason: String },

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("smtp transport error: {0}")]
    Transport(String),
}

/// One outgoing report email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    pub fn new(config: &MailConfig, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            from: config.sender_email.clone(),
            to: config.receiver_emails.clone(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Message transport contract.
pub trait MailTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        message: &'a MailMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), MailError>> + Send + 'a>>;
}

/// Production SMTP transport.
pub struct SmtpMailer {
    host: String,
    port: u16,
    username: String,
    password: String,
}

impl SmtpMailer {
    /// Build a mailer from layered configuration, failing fast when
    /// credentials are incomplete.
    pub fn from_config(config: &MailConfig) -> Result<Self, MailError> {
        let missing = config.missing_fields();
        if !missing.is_empty() {
            return Err(MailError::IncompleteCredentials { missing });
        }

        Ok(Self {
            host: config.smtp_host.clone(),
            port: config.smtp_port,
            username: config.sender_email.clone(),
            password: config.app_password.clone(),
        })
    }

    fn build_message(&self, message: &MailMessage) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(parse_mailbox(&message.from)?)
            .subject(&message.subject)
            .header(ContentType::TEXT_PLAIN);

        for recipient in &message.to {
            builder = builder.to(parse_mailbox(recipient)?);
        }

        builder
            .body(message.body.clone())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

impl MailTransport for SmtpMailer {
    fn send<'a>(
        &'a self,
        message: &'a MailMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), MailError>> + Send + 'a>> {
        Box::pin(async move {
            let email = self.build_message(message)?;

            let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)
                .map_err(|e| MailError::Transport(e.to_string()))?
                .port(self.port)
                .credentials(Credentials::new(
                    self.username.clone(),
                    self.password.clone(),
                ))
                .build();

            transport
                .send(email)
                .await
                .map_err(|e| MailError::Transport(e.to_string()))?;

            info!(recipients = message.to.len(), "report emailed");
            Ok(())
        })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|e: lettre::address::AddressError| {
        MailError::InvalidMailbox {
            address: address.to_owned(),
            reason: e.to_string(),
        }
    })
}

/// Test transport that records sent messages, optionally failing every send.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
    failure: Option<String>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(reason.into()),
        }
    }

    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent
            .lock()
            .expect("sent store should not be poisoned")
            .clone()
    }
}

impl MailTransport for RecordingMailer {
    fn send<'a>(
        &'a self,
        message: &'a MailMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), MailError>> + Send + 'a>> {
        self.sent
            .lock()
            .expect("sent store should not be poisoned")
            .push(message.clone());
        let failure = self.failure.clone();
        Box::pin(async move {
            match failure {
                Some(reason) => Err(MailError::Transport(reason)),
                None => Ok(()),
            }
        })
    }
}
