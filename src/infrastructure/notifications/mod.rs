//! # Notifications
//!
//! [`Notifier`](crate::application::services::Notifier) implementations.
//!
//! - [`SmtpNotifier`]: plain-text email through a STARTTLS relay
//! - [`LogNotifier`]: alerts written to the log

pub mod email;
pub mod log_notifier;

pub use email::SmtpNotifier;
pub use log_notifier::LogNotifier;
