//! # SMTP Notifier
//!
//! Delivers breach alerts as plain-text email over a STARTTLS relay.
//!
//! # Examples
//!
//! ```ignore
//! use settlement_risk::infrastructure::notifications::SmtpNotifier;
//!
//! let notifier = SmtpNotifier::new(&config.smtp)?;
//! notifier.notify("subject", "body", &["risk@example.com".to_string()]).await?;
//! ```

use crate::application::error::TransportError;
use crate::application::services::Notifier;
use crate::config::SmtpConfig;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::fmt;
use std::time::Duration;

/// Email notifier backed by an authenticated SMTP relay.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    relay: String,
}

impl SmtpNotifier {
    /// Creates a notifier for the configured relay.
    ///
    /// No connection is opened until the first alert is sent.
    ///
    /// # Errors
    ///
    /// - `TransportError::InvalidAddress` if the sender address is invalid
    /// - `TransportError::Delivery` if the relay cannot be configured
    pub fn new(config: &SmtpConfig) -> Result<Self, TransportError> {
        let from = parse_mailbox(config.sender())?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| TransportError::delivery(format!("invalid relay {}: {e}", config.host)))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(config.timeout_secs)))
            .build();

        Ok(Self {
            transport,
            from,
            relay: format!("{}:{}", config.host, config.port),
        })
    }
}

impl fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("relay", &self.relay)
            .field("from", &self.from.to_string())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(
        &self,
        subject: &str,
        body: &str,
        recipients: &[String],
    ) -> Result<(), TransportError> {
        let message = compose(&self.from, subject, body, recipients)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| TransportError::delivery(e.to_string()))?;

        tracing::debug!(relay = %self.relay, recipients = recipients.len(), "alert email sent");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, TransportError> {
    address
        .trim()
        .parse()
        .map_err(|e| TransportError::invalid_address(address, e))
}

/// Builds a plain-text message with one `To` per recipient.
fn compose(
    from: &Mailbox,
    subject: &str,
    body: &str,
    recipients: &[String],
) -> Result<Message, TransportError> {
    if recipients.is_empty() {
        return Err(TransportError::NoRecipients);
    }

    let mut builder = Message::builder()
        .from(from.clone())
        .subject(subject)
        .header(ContentType::TEXT_PLAIN);
    for recipient in recipients {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    builder
        .body(body.to_string())
        .map_err(|e| TransportError::message(e.to_string()))
}
