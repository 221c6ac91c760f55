//! # Domain Errors
//!
//! Business rule violations raised by the trade store, the settlement
//! status tracker, and the risk calculations.
//!
//! # Examples
//!
//! ```
//! use settlement_risk::domain::errors::DomainError;
//! use settlement_risk::domain::value_objects::{SettlementStatus, TradeId};
//!
//! let err = DomainError::InvalidTransition {
//!     trade_id: TradeId::new(1),
//!     from: SettlementStatus::Settled,
//!     to: SettlementStatus::Failed,
//! };
//! assert!(err.is_invalid_transition());
//! ```

use crate::domain::value_objects::{ArithmeticError, SettlementStatus, TradeId};
use chrono::NaiveDate;
use thiserror::Error;

/// Domain layer error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A trade with this identifier is already booked.
    #[error("duplicate trade id: {0}")]
    DuplicateTradeId(TradeId),

    /// No trade with this identifier exists.
    #[error("trade not found: {0}")]
    TradeNotFound(TradeId),

    /// The settlement status tracker rejected a transition.
    #[error("invalid settlement transition for trade {trade_id}: {from} -> {to}")]
    InvalidTransition {
        /// Trade whose status change was rejected.
        trade_id: TradeId,
        /// Current status.
        from: SettlementStatus,
        /// Requested status.
        to: SettlementStatus,
    },

    /// Quantity is negative or otherwise unusable.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Price is negative or otherwise unusable.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// Settlement date precedes the trade date.
    #[error("settlement date {settlement_date} is before trade date {trade_date}")]
    InvalidSettlementDate {
        /// Trade date.
        trade_date: NaiveDate,
        /// Settlement date.
        settlement_date: NaiveDate,
    },

    /// A required trade attribute is missing or malformed.
    #[error("invalid trade: {0}")]
    InvalidTrade(String),

    /// Risk limits violate their invariants.
    #[error("invalid risk parameters: {0}")]
    InvalidRiskParameters(String),

    /// Checked arithmetic failed.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

impl DomainError {
    /// Creates an invalid trade error.
    #[must_use]
    pub fn invalid_trade(message: impl Into<String>) -> Self {
        Self::InvalidTrade(message.into())
    }

    /// Creates an invalid risk parameters error.
    #[must_use]
    pub fn invalid_risk_parameters(message: impl Into<String>) -> Self {
        Self::InvalidRiskParameters(message.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TradeNotFound(_))
    }

    /// Returns true if this is a duplicate id error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateTradeId(_))
    }

    /// Returns true if this is a rejected status transition.
    #[must_use]
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }

    /// Returns true if the caller supplied invalid data.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidQuantity(_)
                | Self::InvalidPrice(_)
                | Self::InvalidSettlementDate { .. }
                | Self::InvalidTrade(_)
                | Self::InvalidRiskParameters(_)
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_display() {
        let err = DomainError::DuplicateTradeId(TradeId::new(5));
        assert_eq!(err.to_string(), "duplicate trade id: 5");
        assert!(err.is_duplicate());
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_display() {
        let err = DomainError::TradeNotFound(TradeId::new(9));
        assert!(err.to_string().contains('9'));
        assert!(err.is_not_found());
    }

    #[test]
    fn invalid_transition_display() {
        let err = DomainError::InvalidTransition {
            trade_id: TradeId::new(1),
            from: SettlementStatus::Settled,
            to: SettlementStatus::Settled,
        };
        assert_eq!(
            err.to_string(),
            "invalid settlement transition for trade 1: SETTLED -> SETTLED"
        );
    }

    #[test]
    fn settlement_date_display() {
        let err = DomainError::InvalidSettlementDate {
            trade_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            settlement_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        };
        assert!(err.to_string().contains("2024-03-04"));
        assert!(err.is_validation());
    }

    #[test]
    fn from_arithmetic_error() {
        let err: DomainError = ArithmeticError::Overflow.into();
        assert!(err.to_string().contains("overflow"));
        assert!(!err.is_validation());
    }
}
