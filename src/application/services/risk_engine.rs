//! # Risk Engine
//!
//! Application facade wiring the trade store, the threshold policy and the
//! alert dispatcher together.
//!
//! Every read works on a snapshot taken from the store, so metrics, breaches
//! and reports are always computed from one consistent view of the book.
//! No store lock is held while alerts are delivered.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::alert_dispatcher::{
    AlertDispatcher, AlertRecord, DispatchReport, DispatcherConfig, Notifier,
};
use crate::config::AppConfig;
use crate::domain::entities::{RiskLimits, RiskParameters, Trade};
use crate::domain::errors::DomainError;
use crate::domain::events::{BreachEvent, SettlementStatusChanged};
use crate::domain::services::{
    RiskAggregator, RiskMetrics, SettlementFail, ThresholdPolicy, settlement_fails,
};
use crate::domain::value_objects::{SettlementStatus, TradeId, Timestamp};
use crate::infrastructure::persistence::TradeStore;
use chrono::NaiveDate;
use std::sync::Arc;

/// Trade selection criteria. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeFilter {
    /// Only trades in this status.
    pub status: Option<SettlementStatus>,
    /// Only trades against this counterparty name.
    pub counterparty: Option<String>,
}

impl TradeFilter {
    /// Returns true if `trade` satisfies the filter.
    #[must_use]
    pub fn matches(&self, trade: &Trade) -> bool {
        self.status.is_none_or(|s| trade.status() == s)
            && self
                .counterparty
                .as_deref()
                .is_none_or(|cp| trade.counterparty_name() == cp)
    }
}

/// Metrics and the breaches they produce under one parameter version.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Metrics of the evaluated snapshot.
    pub metrics: RiskMetrics,
    /// Parameters evaluated against.
    pub parameters: Arc<RiskParameters>,
    /// Detected breaches.
    pub breaches: Vec<BreachEvent>,
}

/// Metrics and the largest unsettled trades, taken from one snapshot.
#[derive(Debug, Clone)]
pub struct RiskView {
    /// Metrics of the snapshot.
    pub metrics: RiskMetrics,
    /// Largest unsettled trades of the same snapshot, largest first.
    pub top_unsettled: Vec<Trade>,
}

/// Outcome of one evaluate-then-dispatch cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// The evaluation.
    pub evaluation: Evaluation,
    /// What the dispatcher did with the breaches.
    pub dispatch: DispatchReport,
}

/// Settlement risk engine.
#[derive(Debug)]
pub struct RiskEngine {
    store: Arc<dyn TradeStore>,
    policy: ThresholdPolicy,
    dispatcher: AlertDispatcher,
}

impl RiskEngine {
    /// Creates an engine from its parts.
    #[must_use]
    pub fn new(
        store: Arc<dyn TradeStore>,
        policy: ThresholdPolicy,
        dispatcher: AlertDispatcher,
    ) -> Self {
        Self {
            store,
            policy,
            dispatcher,
        }
    }

    /// Creates an engine from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the configured limits are
    /// invalid.
    pub fn from_config(
        config: &AppConfig,
        store: Arc<dyn TradeStore>,
        notifier: Arc<dyn Notifier>,
    ) -> ApplicationResult<Self> {
        let limits = RiskLimits::new(
            config.risk.max_unsettled_trades,
            config.risk.max_counterparty_exposure,
            config.risk.max_single_trade_value,
        )
        .map_err(|e| ApplicationError::configuration(e.to_string()))?;

        let policy = ThresholdPolicy::new(RiskParameters::initial(config.risk.name.clone(), limits));
        let dispatcher = AlertDispatcher::new(
            notifier,
            DispatcherConfig::with_cooldown(config.alerts.cooldown())
                .with_recipients(config.alerts.recipients.clone())
                .with_recent_capacity(config.alerts.recent_capacity),
        );

        Ok(Self::new(store, policy, dispatcher))
    }

    /// Books a new trade.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::Validation` if the trade is not `PENDING`
    /// - `DomainError::DuplicateTradeId` if the id is taken
    pub fn book_trade(&self, trade: Trade) -> ApplicationResult<Trade> {
        if trade.status() != SettlementStatus::Pending {
            return Err(ApplicationError::validation(format!(
                "new trades must be PENDING, got {}",
                trade.status()
            )));
        }

        self.store.insert(trade.clone())?;
        tracing::info!(
            trade_id = %trade.id(),
            counterparty = trade.counterparty_name(),
            side = %trade.side(),
            "trade booked"
        );
        Ok(trade)
    }

    /// Applies a settlement status transition.
    ///
    /// # Errors
    ///
    /// - `DomainError::TradeNotFound` if the trade does not exist
    /// - `DomainError::InvalidTransition` if the transition is not allowed
    pub fn update_status(
        &self,
        id: TradeId,
        status: SettlementStatus,
    ) -> ApplicationResult<SettlementStatusChanged> {
        match self.store.update_status(id, status) {
            Ok(event) => {
                tracing::info!(
                    trade_id = %id,
                    from = %event.from,
                    to = %event.to,
                    event = event.event_name(),
                    "settlement status changed"
                );
                Ok(event)
            }
            Err(e) => {
                tracing::warn!(trade_id = %id, to = %status, error = %e, "status update rejected");
                Err(e.into())
            }
        }
    }

    /// Returns the trades matching `filter`, ordered by id.
    #[must_use]
    pub fn trades(&self, filter: &TradeFilter) -> Vec<Trade> {
        self.store.query(&|t| filter.matches(t))
    }

    /// Returns one trade.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TradeNotFound` if the trade does not exist.
    pub fn trade(&self, id: TradeId) -> ApplicationResult<Trade> {
        self.store
            .get(id)
            .ok_or_else(|| DomainError::TradeNotFound(id).into())
    }

    /// Returns the status history of a trade.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TradeNotFound` if the trade does not exist.
    pub fn history(&self, id: TradeId) -> ApplicationResult<Vec<SettlementStatusChanged>> {
        Ok(self.store.history(id)?)
    }

    /// Computes metrics over the current book.
    ///
    /// # Errors
    ///
    /// Returns a domain arithmetic error if a trade notional is not
    /// representable.
    pub fn metrics(&self) -> ApplicationResult<RiskMetrics> {
        Ok(RiskAggregator::compute(&self.store.snapshot())?)
    }

    /// Computes metrics and the `top` largest unsettled trades from a single
    /// snapshot of the book.
    ///
    /// # Errors
    ///
    /// Returns a domain arithmetic error if a trade notional is not
    /// representable.
    pub fn risk_view(&self, top: usize) -> ApplicationResult<RiskView> {
        let snapshot = self.store.snapshot();
        Ok(RiskView {
            metrics: RiskAggregator::compute(&snapshot)?,
            top_unsettled: RiskAggregator::largest_unsettled(&snapshot, top)?,
        })
    }

    /// Evaluates the current book against the active parameters, without
    /// alerting.
    ///
    /// # Errors
    ///
    /// Returns a domain arithmetic error if a trade notional is not
    /// representable.
    pub fn evaluate(&self) -> ApplicationResult<Evaluation> {
        self.evaluate_at(Timestamp::now())
    }

    fn evaluate_at(&self, as_of: Timestamp) -> ApplicationResult<Evaluation> {
        let metrics = RiskAggregator::compute_at(&self.store.snapshot(), as_of)?;
        let parameters = self.policy.active();
        let breaches = ThresholdPolicy::evaluate(&metrics, &parameters);
        Ok(Evaluation {
            metrics,
            parameters,
            breaches,
        })
    }

    /// Evaluates the book and dispatches any breaches.
    ///
    /// # Errors
    ///
    /// Returns a domain arithmetic error if a trade notional is not
    /// representable. Delivery failures are reported in the [`CycleReport`],
    /// never as errors.
    pub async fn run_cycle(&self) -> ApplicationResult<CycleReport> {
        let now = Timestamp::now();
        let evaluation = self.evaluate_at(now)?;

        if !evaluation.breaches.is_empty() {
            tracing::warn!(
                breaches = evaluation.breaches.len(),
                version = evaluation.parameters.version(),
                "risk thresholds breached"
            );
        }

        let dispatch = self.dispatcher.dispatch_at(&evaluation.breaches, now).await;
        tracing::debug!(
            unsettled = evaluation.metrics.unsettled_count,
            breaches = evaluation.breaches.len(),
            delivered = dispatch.delivered,
            suppressed = dispatch.suppressed,
            failed = dispatch.failures.len(),
            "evaluation cycle complete"
        );

        Ok(CycleReport {
            evaluation,
            dispatch,
        })
    }

    /// Returns the active risk parameters.
    #[must_use]
    pub fn parameters(&self) -> Arc<RiskParameters> {
        self.policy.active()
    }

    /// Returns every parameter version activated so far, oldest first.
    #[must_use]
    pub fn parameter_history(&self) -> Vec<Arc<RiskParameters>> {
        self.policy.history()
    }

    /// Activates `limits` as the next parameter version.
    pub fn replace_parameters(&self, limits: RiskLimits) -> Arc<RiskParameters> {
        self.policy.activate(limits)
    }

    /// Builds the settlement fails report as of `as_of`.
    ///
    /// # Errors
    ///
    /// Returns a domain arithmetic error if a net money amount overflows.
    pub fn settlement_fails(&self, as_of: NaiveDate) -> ApplicationResult<Vec<SettlementFail>> {
        Ok(settlement_fails(&self.store.snapshot(), as_of)?)
    }

    /// Returns the retained alert records, most recent first.
    #[must_use]
    pub fn recent_alerts(&self) -> Vec<AlertRecord> {
        self.dispatcher.recent()
    }

    /// Returns the number of booked trades.
    #[must_use]
    pub fn trade_count(&self) -> usize {
        self.store.len()
    }
}
