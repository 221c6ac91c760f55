//! # Log Notifier
//!
//! Writes alerts to the log instead of sending them. Used when no SMTP relay
//! is configured.

use crate::application::error::TransportError;
use crate::application::services::Notifier;
use async_trait::async_trait;

/// Notifier that emits each alert as a `WARN` log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        subject: &str,
        body: &str,
        recipients: &[String],
    ) -> Result<(), TransportError> {
        tracing::warn!(
            target: "settlement_risk::alerts",
            subject,
            recipients = recipients.join(","),
            "{body}"
        );
        Ok(())
    }
}
