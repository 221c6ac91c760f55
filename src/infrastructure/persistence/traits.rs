//! # Store Traits
//!
//! Port definition for trade persistence.
//!
//! The store is synchronous: every operation completes under a short-lived
//! lock and none of them performs I/O, so callers on an async runtime can
//! use it directly.
//!
//! # Examples
//!
//! ```
//! use settlement_risk::infrastructure::persistence::{InMemoryTradeStore, TradeStore};
//! use settlement_risk::domain::value_objects::SettlementStatus;
//!
//! let store = InMemoryTradeStore::new();
//! let pending = store.query(&|t| t.status() == SettlementStatus::Pending);
//! assert!(pending.is_empty());
//! ```

use crate::domain::entities::Trade;
use crate::domain::errors::DomainResult;
use crate::domain::events::SettlementStatusChanged;
use crate::domain::value_objects::{SettlementStatus, TradeId};
use std::fmt;

/// Exclusive owner of trade records.
///
/// Trades are never deleted; the only mutation after insert is a status
/// transition accepted by the
/// [`SettlementStatusTracker`](crate::domain::services::SettlementStatusTracker).
pub trait TradeStore: Send + Sync + fmt::Debug {
    /// Inserts a new trade.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateTradeId` if the id already exists.
    fn insert(&self, trade: Trade) -> DomainResult<()>;

    /// Applies a status transition and records it in the trade's history.
    ///
    /// # Errors
    ///
    /// - `DomainError::TradeNotFound` if the trade does not exist
    /// - `DomainError::InvalidTransition` if the tracker rejects the change
    fn update_status(
        &self,
        id: TradeId,
        status: SettlementStatus,
    ) -> DomainResult<SettlementStatusChanged>;

    /// Returns a snapshot of the trades matching `predicate`, ordered by id.
    fn query(&self, predicate: &dyn Fn(&Trade) -> bool) -> Vec<Trade>;

    /// Returns one trade.
    fn get(&self, id: TradeId) -> Option<Trade>;

    /// Returns a snapshot of every trade, ordered by id.
    fn snapshot(&self) -> Vec<Trade> {
        self.query(&|_| true)
    }

    /// Returns the number of trades.
    fn len(&self) -> usize;

    /// Returns true if the store holds no trades.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the accepted status changes of a trade, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TradeNotFound` if the trade does not exist.
    fn history(&self, id: TradeId) -> DomainResult<Vec<SettlementStatusChanged>>;
}
