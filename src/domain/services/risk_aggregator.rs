//! # Risk Aggregator
//!
//! Derives [`RiskMetrics`] from a snapshot of trades.
//!
//! Only [`Pending`](SettlementStatus::Pending) trades contribute. Exposure is
//! gross notional (`quantity × price`) keyed by counterparty name, in a single
//! reporting currency; no netting across sides is applied.
//!
//! Sums saturate at [`Decimal::MAX`]. A saturated exposure still exceeds
//! any configured limit, so breach detection keeps working on books whose
//! total is not representable.
//!
//! The aggregator is a pure function of its input: it holds no state, takes
//! no locks and never reads the clock unless asked to via
//! [`RiskAggregator::compute`].
//!
//! # Examples
//!
//! ```
//! use settlement_risk::domain::entities::TradeBuilder;
//! use settlement_risk::domain::services::RiskAggregator;
//! use settlement_risk::domain::value_objects::{OrderSide, TradeId};
//! use rust_decimal::Decimal;
//!
//! let trades = vec![
//!     TradeBuilder::new(TradeId::new(1), OrderSide::Buy, Decimal::new(100, 0), Decimal::new(5025, 2))
//!         .counterparty("0005", "Party A")
//!         .try_build()
//!         .unwrap(),
//! ];
//!
//! let metrics = RiskAggregator::compute(&trades).unwrap();
//! assert_eq!(metrics.unsettled_count, 1);
//! assert_eq!(metrics.largest_unsettled_trade, Decimal::new(5025, 0));
//! ```

use crate::domain::entities::Trade;
use crate::domain::errors::DomainResult;
use crate::domain::value_objects::{OrderSide, TradeId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unsettled activity on one side of the book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideSummary {
    /// Number of unsettled trades.
    pub count: u64,
    /// Aggregate unsettled notional.
    pub notional: Decimal,
}

/// Aggregate settlement risk derived from a trade snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Number of pending trades.
    pub unsettled_count: u64,
    /// Counterparty name → aggregate unsettled notional.
    pub counterparty_exposure: BTreeMap<String, Decimal>,
    /// Notional of the largest unsettled trade, zero when there is none.
    pub largest_unsettled_trade: Decimal,
    /// One trade carrying the largest unsettled notional.
    pub largest_unsettled_trade_id: Option<TradeId>,
    /// Sum of all unsettled notional.
    pub total_unsettled_notional: Decimal,
    /// Unsettled buys.
    pub buy: SideSummary,
    /// Unsettled sells.
    pub sell: SideSummary,
    /// Counterparty name → number of unsettled trades.
    pub counterparty_trade_counts: BTreeMap<String, u64>,
    /// When the metrics were computed.
    pub computed_at: Timestamp,
}

impl RiskMetrics {
    /// Metrics of an empty book.
    #[must_use]
    pub fn empty(computed_at: Timestamp) -> Self {
        Self {
            unsettled_count: 0,
            counterparty_exposure: BTreeMap::new(),
            largest_unsettled_trade: Decimal::ZERO,
            largest_unsettled_trade_id: None,
            total_unsettled_notional: Decimal::ZERO,
            buy: SideSummary::default(),
            sell: SideSummary::default(),
            counterparty_trade_counts: BTreeMap::new(),
            computed_at,
        }
    }

    /// Exposure to one counterparty, zero if it has no unsettled trades.
    #[must_use]
    pub fn exposure_to(&self, counterparty: &str) -> Decimal {
        self.counterparty_exposure
            .get(counterparty)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// Stateless calculator for [`RiskMetrics`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskAggregator;

impl RiskAggregator {
    /// Computes metrics stamped with the current time.
    ///
    /// # Errors
    ///
    /// See [`RiskAggregator::compute_at`].
    pub fn compute(trades: &[Trade]) -> DomainResult<RiskMetrics> {
        Self::compute_at(trades, Timestamp::now())
    }

    /// Computes metrics stamped with `as_of`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` only if a trade's own notional is
    /// not representable. Aggregates saturate instead of failing.
    pub fn compute_at(trades: &[Trade], as_of: Timestamp) -> DomainResult<RiskMetrics> {
        let mut metrics = RiskMetrics::empty(as_of);

        for trade in trades.iter().filter(|t| t.is_unsettled()) {
            let notional = trade.notional()?;

            metrics.unsettled_count = metrics.unsettled_count.saturating_add(1);
            metrics.total_unsettled_notional =
                metrics.total_unsettled_notional.saturating_add(notional);

            let exposure = metrics
                .counterparty_exposure
                .entry(trade.counterparty_name().to_string())
                .or_insert(Decimal::ZERO);
            *exposure = exposure.saturating_add(notional);

            let count = metrics
                .counterparty_trade_counts
                .entry(trade.counterparty_name().to_string())
                .or_insert(0);
            *count = count.saturating_add(1);

            let side = match trade.side() {
                OrderSide::Buy => &mut metrics.buy,
                OrderSide::Sell => &mut metrics.sell,
            };
            side.count = side.count.saturating_add(1);
            side.notional = side.notional.saturating_add(notional);

            if metrics.largest_unsettled_trade_id.is_none()
                || notional > metrics.largest_unsettled_trade
            {
                metrics.largest_unsettled_trade = notional;
                metrics.largest_unsettled_trade_id = Some(trade.id());
            }
        }

        Ok(metrics)
    }

    /// Returns up to `n` unsettled trades with the largest notional,
    /// largest first. Ties are ordered by trade id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` if a notional overflows.
    pub fn largest_unsettled(trades: &[Trade], n: usize) -> DomainResult<Vec<Trade>> {
        let mut ranked = trades
            .iter()
            .filter(|t| t.is_unsettled())
            .map(|t| Ok((t.notional()?, t)))
            .collect::<DomainResult<Vec<_>>>()?;

        ranked.sort_by(|(a_notional, a), (b_notional, b)| {
            b_notional.cmp(a_notional).then_with(|| a.id().cmp(&b.id()))
        });

        Ok(ranked
            .into_iter()
            .take(n)
            .map(|(_, trade)| trade.clone())
            .collect())
    }
}
