//! # Settlement Events
//!
//! Audit records for settlement status changes.
//!
//! Trades are never deleted; their history is the ordered list of
//! [`SettlementStatusChanged`] events the trade store recorded for them.

use crate::domain::value_objects::{EventId, SettlementStatus, TradeId, Timestamp};
use serde::{Deserialize, Serialize};

/// Event recorded when the tracker accepts a status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementStatusChanged {
    /// Unique identifier for this event.
    pub event_id: EventId,
    /// The trade whose status changed.
    pub trade_id: TradeId,
    /// Status before the change.
    pub from: SettlementStatus,
    /// Status after the change.
    pub to: SettlementStatus,
    /// When the change was applied.
    pub occurred_at: Timestamp,
}

impl SettlementStatusChanged {
    /// Creates a new event stamped now.
    #[must_use]
    pub fn new(trade_id: TradeId, from: SettlementStatus, to: SettlementStatus) -> Self {
        Self {
            event_id: EventId::new_v4(),
            trade_id,
            from,
            to,
            occurred_at: Timestamp::now(),
        }
    }

    /// Returns the name of this event.
    #[must_use]
    pub fn event_name(&self) -> &'static str {
        match self.to {
            SettlementStatus::Settled => "SettlementConfirmed",
            SettlementStatus::Failed => "SettlementFailed",
            SettlementStatus::Cancelled => "TradeCancelled",
            SettlementStatus::Pending => "SettlementPending",
        }
    }
}
