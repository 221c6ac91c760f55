//! # Threshold Policy
//!
//! Owns the active [`RiskParameters`] and evaluates [`RiskMetrics`] against
//! them.
//!
//! Evaluation itself is stateless: [`ThresholdPolicy::evaluate`] is a pure
//! function of the metrics and the parameters, and stamps every breach with
//! the metrics' computation time so identical inputs always yield identical
//! breach sets. All comparisons are strict: a value equal to its limit is
//! not a breach.
//!
//! The active parameters live behind a lock holding an `Arc`; readers take a
//! snapshot and never observe a half-replaced set. Replacing limits creates
//! the next version and appends it to the history.

use crate::domain::entities::{RiskLimits, RiskParameters};
use crate::domain::events::{BreachEvent, BreachKind};
use crate::domain::services::risk_aggregator::RiskMetrics;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Holder of the active risk parameters and their version history.
#[derive(Debug)]
pub struct ThresholdPolicy {
    active: RwLock<Arc<RiskParameters>>,
    history: RwLock<Vec<Arc<RiskParameters>>>,
}

impl ThresholdPolicy {
    /// Creates a policy with `initial` as the active parameters.
    #[must_use]
    pub fn new(initial: RiskParameters) -> Self {
        let initial = Arc::new(initial);
        Self {
            active: RwLock::new(Arc::clone(&initial)),
            history: RwLock::new(vec![initial]),
        }
    }

    /// Returns a snapshot of the active parameters.
    #[must_use]
    pub fn active(&self) -> Arc<RiskParameters> {
        Arc::clone(&self.active.read())
    }

    /// Activates `limits` as the next version and returns it.
    pub fn activate(&self, limits: RiskLimits) -> Arc<RiskParameters> {
        let mut active = self.active.write();
        let next = Arc::new(active.supersede(limits));
        *active = Arc::clone(&next);
        self.history.write().push(Arc::clone(&next));

        tracing::info!(
            name = next.name(),
            version = next.version(),
            "risk parameters activated"
        );
        next
    }

    /// Returns every version activated so far, oldest first, including the
    /// active one.
    #[must_use]
    pub fn history(&self) -> Vec<Arc<RiskParameters>> {
        self.history.read().clone()
    }

    /// Evaluates `metrics` against the active parameters.
    #[must_use]
    pub fn evaluate_active(&self, metrics: &RiskMetrics) -> Vec<BreachEvent> {
        Self::evaluate(metrics, &self.active())
    }

    /// Evaluates `metrics` against `parameters`.
    ///
    /// Produces at most one `COUNT_BREACH`, one `EXPOSURE_BREACH` per
    /// offending counterparty (in counterparty order) and at most one
    /// `SINGLE_TRADE_BREACH`.
    #[must_use]
    pub fn evaluate(metrics: &RiskMetrics, parameters: &RiskParameters) -> Vec<BreachEvent> {
        let limits = parameters.limits();
        let breach = |kind, observed, limit, counterparty, trade_id| BreachEvent {
            kind,
            observed,
            limit,
            detected_at: metrics.computed_at,
            counterparty,
            trade_id,
            parameters_version: parameters.version(),
        };

        let mut breaches = Vec::new();

        if metrics.unsettled_count > limits.max_unsettled_trades() {
            breaches.push(breach(
                BreachKind::CountBreach,
                Decimal::from(metrics.unsettled_count),
                Decimal::from(limits.max_unsettled_trades()),
                None,
                None,
            ));
        }

        for (counterparty, exposure) in &metrics.counterparty_exposure {
            if *exposure > limits.max_counterparty_exposure() {
                breaches.push(breach(
                    BreachKind::ExposureBreach,
                    *exposure,
                    limits.max_counterparty_exposure(),
                    Some(counterparty.clone()),
                    None,
                ));
            }
        }

        if metrics.largest_unsettled_trade > limits.max_single_trade_value() {
            breaches.push(breach(
                BreachKind::SingleTradeBreach,
                metrics.largest_unsettled_trade,
                limits.max_single_trade_value(),
                None,
                metrics.largest_unsettled_trade_id,
            ));
        }

        breaches
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{TradeId, Timestamp};
    use std::collections::BTreeMap;

    fn limits(count: u64, exposure: i64, single: i64) -> RiskLimits {
        RiskLimits::new(count, Decimal::new(exposure, 0), Decimal::new(single, 0)).unwrap()
    }

    fn params(count: u64, exposure: i64, single: i64) -> RiskParameters {
        RiskParameters::initial("test", limits(count, exposure, single))
    }

    fn metrics() -> RiskMetrics {
        let mut metrics = RiskMetrics::empty(Timestamp::from_secs(1_700_000_000).unwrap());
        metrics.unsettled_count = 2;
        metrics.counterparty_exposure = BTreeMap::from([
            ("Party A".to_string(), Decimal::new(5025, 0)),
            ("Party B".to_string(), Decimal::new(1_000_000, 0)),
        ]);
        metrics.largest_unsettled_trade = Decimal::new(1_000_000, 0);
        metrics.largest_unsettled_trade_id = Some(TradeId::new(2));
        metrics
    }

    mod evaluate {
        use super::*;

        #[test]
        fn no_breach_within_limits() {
            let breaches = ThresholdPolicy::evaluate(&metrics(), &params(150, 2_000_000, 2_000_000));
            assert!(breaches.is_empty());
        }

        #[test]
        fn single_exposure_breach() {
            let breaches = ThresholdPolicy::evaluate(&metrics(), &params(150, 500_000, 2_000_000));
            assert_eq!(breaches.len(), 1);
            assert_eq!(breaches[0].kind, BreachKind::ExposureBreach);
            assert_eq!(breaches[0].counterparty.as_deref(), Some("Party B"));
            assert_eq!(breaches[0].observed, Decimal::new(1_000_000, 0));
            assert_eq!(breaches[0].limit, Decimal::new(500_000, 0));
        }

        #[test]
        fn exposure_breach_per_counterparty() {
            let breaches = ThresholdPolicy::evaluate(&metrics(), &params(150, 1_000, 2_000_000));
            let counterparties: Vec<_> = breaches
                .iter()
                .map(|b| b.counterparty.clone().unwrap())
                .collect();
            assert_eq!(counterparties, vec!["Party A", "Party B"]);
        }

        #[test]
        fn count_breach() {
            let breaches = ThresholdPolicy::evaluate(&metrics(), &params(1, 2_000_000, 2_000_000));
            assert_eq!(breaches.len(), 1);
            assert_eq!(breaches[0].kind, BreachKind::CountBreach);
            assert_eq!(breaches[0].observed, Decimal::TWO);
            assert_eq!(breaches[0].counterparty, None);
        }

        #[test]
        fn single_trade_breach_names_trade() {
            let breaches = ThresholdPolicy::evaluate(&metrics(), &params(150, 2_000_000, 750_000));
            assert_eq!(breaches.len(), 1);
            assert_eq!(breaches[0].kind, BreachKind::SingleTradeBreach);
            assert_eq!(breaches[0].trade_id, Some(TradeId::new(2)));
        }

        #[test]
        fn comparisons_are_strict() {
            let breaches = ThresholdPolicy::evaluate(&metrics(), &params(2, 1_000_000, 1_000_000));
            assert!(breaches.is_empty());
        }

        #[test]
        fn is_deterministic() {
            let p = params(1, 1_000, 1_000);
            let m = metrics();
            assert_eq!(ThresholdPolicy::evaluate(&m, &p), ThresholdPolicy::evaluate(&m, &p));
        }

        #[test]
        fn breaches_carry_metrics_timestamp_and_version() {
            let m = metrics();
            let breaches = ThresholdPolicy::evaluate(&m, &params(1, 1_000, 1_000));
            assert_eq!(breaches.len(), 4);
            for breach in breaches {
                assert_eq!(breach.detected_at, m.computed_at);
                assert_eq!(breach.parameters_version, 1);
            }
        }
    }

    mod activation {
        use super::*;

        #[test]
        fn activate_creates_next_version() {
            let policy = ThresholdPolicy::new(params(150, 1_000_000, 750_000));
            let before = policy.active();

            let next = policy.activate(limits(10, 500_000, 250_000));

            assert_eq!(next.version(), 2);
            assert_eq!(policy.active().version(), 2);
            // earlier snapshots are unaffected
            assert_eq!(before.version(), 1);
            assert_eq!(before.limits().max_unsettled_trades(), 150);
        }

        #[test]
        fn history_is_kept_in_order() {
            let policy = ThresholdPolicy::new(params(150, 1_000_000, 750_000));
            policy.activate(limits(10, 500_000, 250_000));
            policy.activate(limits(20, 500_000, 250_000));

            let versions: Vec<_> = policy.history().iter().map(|p| p.version()).collect();
            assert_eq!(versions, vec![1, 2, 3]);
        }

        #[test]
        fn evaluate_active_uses_current_version() {
            let policy = ThresholdPolicy::new(params(150, 2_000_000, 2_000_000));
            assert!(policy.evaluate_active(&metrics()).is_empty());

            policy.activate(limits(150, 500_000, 2_000_000));
            let breaches = policy.evaluate_active(&metrics());
            assert_eq!(breaches.len(), 1);
            assert_eq!(breaches[0].parameters_version, 2);
        }
    }
}
