//! # Settlement Status Tracker
//!
//! State machine governing settlement status transitions.
//!
//! # State Machine
//!
//! ```text
//! Pending ─┬→ Settled    (terminal)
//!          ├→ Failed     (terminal)
//!          └→ Cancelled  (terminal)
//! ```
//!
//! Settlement facts, once recorded, are never overwritten: every transition
//! out of a terminal state is rejected, including self-transitions.
//!
//! # Examples
//!
//! ```
//! use settlement_risk::domain::services::SettlementStatusTracker;
//! use settlement_risk::domain::value_objects::{SettlementStatus, TradeId};
//!
//! let tracker = SettlementStatusTracker;
//! assert!(tracker.validate(TradeId::new(1), SettlementStatus::Pending, SettlementStatus::Settled).is_ok());
//! assert!(tracker.validate(TradeId::new(1), SettlementStatus::Settled, SettlementStatus::Failed).is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{SettlementStatus, TradeId};

/// Validates settlement status transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettlementStatusTracker;

impl SettlementStatusTracker {
    /// Returns true if `from` may transition to `to`.
    #[must_use]
    pub const fn can_transition(&self, from: SettlementStatus, to: SettlementStatus) -> bool {
        matches!(
            (from, to),
            (SettlementStatus::Pending, SettlementStatus::Settled)
                | (SettlementStatus::Pending, SettlementStatus::Failed)
                | (SettlementStatus::Pending, SettlementStatus::Cancelled)
        )
    }

    /// Returns the valid next states from `from`.
    #[must_use]
    pub fn valid_transitions(&self, from: SettlementStatus) -> Vec<SettlementStatus> {
        SettlementStatus::ALL
            .into_iter()
            .filter(|to| self.can_transition(from, *to))
            .collect()
    }

    /// Validates a transition for a specific trade.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the state machine does not
    /// allow `from → to`.
    pub fn validate(
        &self,
        trade_id: TradeId,
        from: SettlementStatus,
        to: SettlementStatus,
    ) -> DomainResult<()> {
        if self.can_transition(from, to) {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition { trade_id, from, to })
        }
    }
}
