//! # In-Memory Trade Store
//!
//! In-memory implementation of [`TradeStore`].
//!
//! Records and their status history live behind a single `RwLock`, so a
//! reader's snapshot never straddles a status update.

use crate::domain::entities::Trade;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::events::SettlementStatusChanged;
use crate::domain::services::SettlementStatusTracker;
use crate::domain::value_objects::{SettlementStatus, TradeId};
use crate::infrastructure::persistence::traits::TradeStore;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default)]
struct Inner {
    trades: BTreeMap<TradeId, Trade>,
    history: HashMap<TradeId, Vec<SettlementStatusChanged>>,
}

/// In-memory implementation of [`TradeStore`].
#[derive(Debug, Default)]
pub struct InMemoryTradeStore {
    inner: RwLock<Inner>,
    tracker: SettlementStatusTracker,
}

impl InMemoryTradeStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `trades`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateTradeId` if two trades share an id.
    pub fn with_trades(trades: impl IntoIterator<Item = Trade>) -> DomainResult<Self> {
        let store = Self::new();
        for trade in trades {
            store.insert(trade)?;
        }
        Ok(store)
    }
}

impl TradeStore for InMemoryTradeStore {
    fn insert(&self, trade: Trade) -> DomainResult<()> {
        let mut inner = self.inner.write();
        let id = trade.id();
        if inner.trades.contains_key(&id) {
            return Err(DomainError::DuplicateTradeId(id));
        }
        inner.trades.insert(id, trade);
        inner.history.insert(id, Vec::new());
        Ok(())
    }

    fn update_status(
        &self,
        id: TradeId,
        status: SettlementStatus,
    ) -> DomainResult<SettlementStatusChanged> {
        let mut inner = self.inner.write();
        let current = inner
            .trades
            .get(&id)
            .ok_or(DomainError::TradeNotFound(id))?;

        let from = current.status();
        self.tracker.validate(id, from, status)?;

        let updated = current.with_status(status);
        let event = SettlementStatusChanged::new(id, from, status);

        inner.trades.insert(id, updated);
        inner.history.entry(id).or_default().push(event.clone());
        Ok(event)
    }

    fn query(&self, predicate: &dyn Fn(&Trade) -> bool) -> Vec<Trade> {
        self.inner
            .read()
            .trades
            .values()
            .filter(|t| predicate(t))
            .cloned()
            .collect()
    }

    fn get(&self, id: TradeId) -> Option<Trade> {
        self.inner.read().trades.get(&id).cloned()
    }

    fn len(&self) -> usize {
        self.inner.read().trades.len()
    }

    fn history(&self, id: TradeId) -> DomainResult<Vec<SettlementStatusChanged>> {
        let inner = self.inner.read();
        if !inner.trades.contains_key(&id) {
            return Err(DomainError::TradeNotFound(id));
        }
        Ok(inner.history.get(&id).cloned().unwrap_or_default())
    }
}
