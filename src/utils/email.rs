//! Outbound email.
//!
//! Everything that sends mail goes through the [`Mailer`] trait so the
//! delivery backend can be swapped: [`SmtpMailer`] for real delivery,
//! [`LogMailer`] when SMTP is disabled, and `RecordingMailer` in tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lettre::message::{Mailbox, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::instrument;

use shelfwise_config::EmailConfig;
use shelfwise_core::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingEmail {
    pub fn borrow_confirmation(to: &str, title: &str, due_date: DateTime<Utc>) -> Self {
        Self {
            to: to.to_string(),
            subject: "Book Borrowed Successfully".to_string(),
            body: format!(
                "You have successfully borrowed the book titled \"{}\". Please return it by {}.",
                title,
                due_date.format("%Y-%m-%d")
            ),
        }
    }

    pub fn overdue_reminder(to: &str, titles: &[String]) -> Self {
        Self {
            to: to.to_string(),
            subject: "Book Return Reminder".to_string(),
            body: format!(
                "The due date for the following books you borrowed has passed: {}. Please return them as soon as possible.",
                titles.join(", ")
            ),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError>;
}

/// Picks the SMTP backend when `SMTP_ENABLED` is set, the logging one otherwise.
pub fn mailer_from_config(config: &EmailConfig) -> Result<Arc<dyn Mailer>, AppError> {
    if config.enabled {
        Ok(Arc::new(SmtpMailer::new(config.clone())?))
    } else {
        tracing::info!("SMTP disabled, outgoing email will only be logged");
        Ok(Arc::new(LogMailer))
    }
}

pub struct SmtpMailer {
    from: Mailbox,
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> Result<Self, AppError> {
        let from = config
            .from_mailbox()
            .parse::<Mailbox>()
            .map_err(|e| AppError::internal_error(format!("Invalid from email: {}", e)))?;

        let transport = if config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

            SmtpTransport::relay(&config.smtp_host)
                .map_err(|e| {
                    AppError::internal_error(format!("Failed to create SMTP relay: {}", e))
                })?
                .port(config.smtp_port)
                .credentials(creds)
                .build()
        };

        Ok(Self { from, transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, email), fields(to = %email.to, subject = %email.subject))]
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| AppError::internal_error(format!("Invalid to email: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(email.body)
            .map_err(|e| AppError::internal_error(format!("Failed to build email: {}", e)))?;

        // lettre's SmtpTransport blocks; keep it off the runtime threads.
        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| AppError::internal_error(format!("Email task panicked: {}", e)))?
            .map_err(|e| AppError::internal_error(format!("Failed to send email: {}", e)))?;

        tracing::info!("Email sent");
        Ok(())
    }
}

pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            body = %email.body,
            "Email delivery disabled, message logged instead"
        );
        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use recording::RecordingMailer;

#[cfg(any(test, feature = "test-utils"))]
mod recording {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use super::*;

    /// Keeps every delivered message in memory. Addresses registered with
    /// [`RecordingMailer::fail_for`] get an error instead.
    #[derive(Default)]
    pub struct RecordingMailer {
        sent: Mutex<Vec<OutgoingEmail>>,
        failing: Mutex<HashSet<String>>,
    }

    impl RecordingMailer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_for(&self, address: &str) {
            self.failing.lock().unwrap().insert(address.to_string());
        }

        pub fn sent(&self) -> Vec<OutgoingEmail> {
            self.sent.lock().unwrap().clone()
        }

        pub fn sent_to(&self, address: &str) -> Vec<OutgoingEmail> {
            self.sent()
                .into_iter()
                .filter(|email| email.to == address)
                .collect()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: OutgoingEmail) -> Result<(), AppError> {
            if self.failing.lock().unwrap().contains(&email.to) {
                return Err(AppError::internal_error(format!(
                    "Mailbox {} rejected the message",
                    email.to
                )));
            }
            self.sent.lock().unwrap().push(email);
            Ok(())
        }
    }
}
