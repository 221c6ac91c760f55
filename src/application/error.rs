//! # Application Errors
//!
//! Error types for the application layer.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)   - Business rule violations
//! ├── Validation(String)    - Input validation failures
//! └── Configuration(String) - Invalid or missing configuration
//!
//! TransportError             - Notification delivery failures (never fatal)
//! ```
//!
//! # Examples
//!
//! ```
//! use settlement_risk::application::error::ApplicationError;
//! use settlement_risk::domain::errors::DomainError;
//! use settlement_risk::domain::value_objects::TradeId;
//!
//! let err: ApplicationError = DomainError::TradeNotFound(TradeId::new(7)).into();
//! assert!(err.is_not_found());
//!
//! let err = ApplicationError::validation("status is required");
//! assert!(err.is_validation());
//! ```

use crate::domain::errors::DomainError;
use thiserror::Error;

/// Notification transport error.
///
/// Reported by a [`Notifier`](crate::application::services::Notifier).
/// The alert dispatcher logs these and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// No recipients were configured.
    #[error("no alert recipients configured")]
    NoRecipients,

    /// A sender or recipient address could not be parsed.
    #[error("invalid address {address}: {reason}")]
    InvalidAddress {
        /// The offending address.
        address: String,
        /// Parser message.
        reason: String,
    },

    /// The message could not be built.
    #[error("message error: {0}")]
    Message(String),

    /// The transport failed to deliver.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl TransportError {
    /// Creates an invalid address error.
    #[must_use]
    pub fn invalid_address(address: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidAddress {
            address: address.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a message error.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Creates a delivery error.
    #[must_use]
    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery(message.into())
    }
}

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain error from business logic.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_not_found())
    }

    /// Returns true if the request conflicts with current state
    /// (duplicate id or rejected transition).
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_duplicate() || e.is_invalid_transition())
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation(_) => true,
            Self::Domain(e) => e.is_validation(),
            Self::Configuration(_) => false,
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
