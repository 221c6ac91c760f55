//! # Alert Dispatcher
//!
//! Turns [`BreachEvent`]s into notifications, at most once per breach key
//! within a cool-down window.
//!
//! The dispatcher remembers when each `(kind, counterparty)` key was last
//! attempted. A key attempted less than `cooldown` ago is suppressed. The
//! attempt is recorded *before* the notifier runs and is not rolled back on
//! failure, so a failing transport is not retried until the window expires.
//!
//! Bookkeeping sits behind a mutex that is released before any notifier is
//! awaited; a slow transport never blocks other dispatchers or readers of
//! [`AlertDispatcher::recent`].
//!
//! # Examples
//!
//! ```ignore
//! use settlement_risk::application::services::{AlertDispatcher, DispatcherConfig};
//! use std::sync::Arc;
//!
//! let dispatcher = AlertDispatcher::new(notifier, DispatcherConfig::default());
//! let report = dispatcher.dispatch(&breaches).await;
//! tracing::info!(delivered = report.delivered, suppressed = report.suppressed, "alerts dispatched");
//! ```

use crate::application::error::TransportError;
use crate::domain::events::{BreachEvent, BreachKey};
use crate::domain::value_objects::Timestamp;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default cool-down between alerts for the same breach key.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(15 * 60);

/// Default number of alert records kept for inspection.
pub const DEFAULT_RECENT_CAPACITY: usize = 100;

/// Outbound notification transport.
#[async_trait]
pub trait Notifier: Send + Sync + fmt::Debug {
    /// Delivers one alert to `recipients`.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` if the alert could not be delivered.
    async fn notify(
        &self,
        subject: &str,
        body: &str,
        recipients: &[String],
    ) -> Result<(), TransportError>;
}

/// Configuration for the alert dispatcher.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Minimum time between alerts for the same breach key.
    pub cooldown: Duration,
    /// Alert recipients.
    pub recipients: Vec<String>,
    /// Number of alert records retained.
    pub recent_capacity: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
            recipients: Vec::new(),
            recent_capacity: DEFAULT_RECENT_CAPACITY,
        }
    }
}

impl DispatcherConfig {
    /// Creates a configuration with the given cool-down.
    #[must_use]
    pub fn with_cooldown(cooldown: Duration) -> Self {
        Self {
            cooldown,
            ..Default::default()
        }
    }

    /// Sets the recipients.
    #[must_use]
    pub fn with_recipients(mut self, recipients: Vec<String>) -> Self {
        self.recipients = recipients;
        self
    }

    /// Sets the number of retained alert records.
    #[must_use]
    pub fn with_recent_capacity(mut self, capacity: usize) -> Self {
        self.recent_capacity = capacity;
        self
    }
}

/// Result of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertOutcome {
    /// The notifier accepted the alert.
    Delivered,
    /// The notifier failed.
    Failed(String),
}

/// One attempted alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// The breach that triggered the alert.
    pub breach: BreachEvent,
    /// Alert subject line.
    pub subject: String,
    /// When delivery was attempted.
    pub attempted_at: Timestamp,
    /// Delivery outcome.
    pub outcome: AlertOutcome,
}

/// Summary of one [`AlertDispatcher::dispatch`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Notifier invocations.
    pub attempted: usize,
    /// Invocations that succeeded.
    pub delivered: usize,
    /// Events skipped because their key was inside the cool-down window.
    pub suppressed: usize,
    /// Failed invocations.
    pub failures: Vec<(BreachKey, TransportError)>,
}

impl DispatchReport {
    /// Returns true if any notifier invocation failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

#[derive(Debug, Default)]
struct State {
    last_attempt: HashMap<BreachKey, Timestamp>,
    recent: VecDeque<AlertRecord>,
}

/// Deduplicating alert dispatcher.
#[derive(Debug)]
pub struct AlertDispatcher {
    notifier: Arc<dyn Notifier>,
    config: DispatcherConfig,
    state: Mutex<State>,
}

impl AlertDispatcher {
    /// Creates a dispatcher delivering through `notifier`.
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>, config: DispatcherConfig) -> Self {
        Self {
            notifier,
            config,
            state: Mutex::new(State::default()),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Dispatches `events` using the current time.
    pub async fn dispatch(&self, events: &[BreachEvent]) -> DispatchReport {
        self.dispatch_at(events, Timestamp::now()).await
    }

    /// Dispatches `events` as if the current time were `now`.
    ///
    /// Notifier failures are logged and reported, never returned as errors.
    pub async fn dispatch_at(&self, events: &[BreachEvent], now: Timestamp) -> DispatchReport {
        let mut report = DispatchReport::default();
        let due = self.claim_due(events, now, &mut report);

        let mut records = Vec::with_capacity(due.len());
        for event in due {
            let subject = event.subject();
            report.attempted += 1;

            let outcome = match self
                .notifier
                .notify(&subject, &event.body(), &self.config.recipients)
                .await
            {
                Ok(()) => {
                    report.delivered += 1;
                    tracing::info!(
                        kind = %event.kind,
                        counterparty = event.counterparty.as_deref().unwrap_or("-"),
                        observed = %event.observed,
                        limit = %event.limit,
                        "breach alert sent"
                    );
                    AlertOutcome::Delivered
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        kind = %event.kind,
                        counterparty = event.counterparty.as_deref().unwrap_or("-"),
                        "breach alert delivery failed"
                    );
                    report.failures.push((event.key(), e.clone()));
                    AlertOutcome::Failed(e.to_string())
                }
            };

            records.push(AlertRecord {
                breach: event,
                subject,
                attempted_at: now,
                outcome,
            });
        }

        self.remember(records);
        report
    }

    /// Returns the retained alert records, most recent first.
    #[must_use]
    pub fn recent(&self) -> Vec<AlertRecord> {
        self.state.lock().recent.iter().rev().cloned().collect()
    }

    /// Forgets every cool-down, so the next breach of any key is alerted.
    pub fn reset(&self) {
        self.state.lock().last_attempt.clear();
        tracing::debug!("alert cool-downs cleared");
    }

    /// Marks due events as attempted and returns them; counts the rest as
    /// suppressed.
    fn claim_due(
        &self,
        events: &[BreachEvent],
        now: Timestamp,
        report: &mut DispatchReport,
    ) -> Vec<BreachEvent> {
        let mut state = self.state.lock();
        let mut due = Vec::new();

        for event in events {
            let key = event.key();
            let cooling = state
                .last_attempt
                .get(&key)
                .is_some_and(|last| now.elapsed_since(last) < self.config.cooldown);

            if cooling {
                report.suppressed += 1;
                tracing::debug!(key = %key, "breach alert suppressed by cool-down");
                continue;
            }

            state.last_attempt.insert(key, now);
            due.push(event.clone());
        }

        due
    }

    fn remember(&self, records: Vec<AlertRecord>) {
        if self.config.recent_capacity == 0 || records.is_empty() {
            return;
        }
        let mut state = self.state.lock();
        for record in records {
            if state.recent.len() == self.config.recent_capacity {
                state.recent.pop_front();
            }
            state.recent.push_back(record);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::events::BreachKind;
    use rust_decimal::Decimal;

    #[derive(Debug, Default)]
    struct RecordingNotifier {
        subjects: Mutex<Vec<String>>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn count(&self) -> usize {
            self.subjects.lock().len()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(
            &self,
            subject: &str,
            _body: &str,
            _recipients: &[String],
        ) -> Result<(), TransportError> {
            self.subjects.lock().push(subject.to_string());
            if self.fail {
                Err(TransportError::delivery("smtp unavailable"))
            } else {
                Ok(())
            }
        }
    }

    fn at(secs: i64) -> Timestamp {
        Timestamp::from_secs(1_700_000_000 + secs).unwrap()
    }

    fn breach(kind: BreachKind, counterparty: Option<&str>) -> BreachEvent {
        BreachEvent {
            kind,
            observed: Decimal::new(1_000_000, 0),
            limit: Decimal::new(500_000, 0),
            detected_at: at(0),
            counterparty: counterparty.map(str::to_string),
            trade_id: None,
            parameters_version: 1,
        }
    }

    fn dispatcher(notifier: Arc<RecordingNotifier>, cooldown_secs: u64) -> AlertDispatcher {
        AlertDispatcher::new(
            notifier,
            DispatcherConfig::with_cooldown(Duration::from_secs(cooldown_secs))
                .with_recipients(vec!["risk@example.com".to_string()]),
        )
    }

    mod cooldown {
        use super::*;

        #[tokio::test]
        async fn first_event_is_sent() {
            let notifier = Arc::new(RecordingNotifier::default());
            let dispatcher = dispatcher(Arc::clone(&notifier), 60);

            let report = dispatcher
                .dispatch_at(&[breach(BreachKind::ExposureBreach, Some("Party B"))], at(0))
                .await;

            assert_eq!(report.attempted, 1);
            assert_eq!(report.delivered, 1);
            assert_eq!(report.suppressed, 0);
            assert_eq!(notifier.count(), 1);
        }

        #[tokio::test]
        async fn repeat_inside_window_is_suppressed() {
            let notifier = Arc::new(RecordingNotifier::default());
            let dispatcher = dispatcher(Arc::clone(&notifier), 60);
            let events = [breach(BreachKind::ExposureBreach, Some("Party B"))];

            dispatcher.dispatch_at(&events, at(0)).await;
            let report = dispatcher.dispatch_at(&events, at(59)).await;

            assert_eq!(report.attempted, 0);
            assert_eq!(report.suppressed, 1);
            assert_eq!(notifier.count(), 1);
        }

        #[tokio::test]
        async fn repeat_after_window_is_sent() {
            let notifier = Arc::new(RecordingNotifier::default());
            let dispatcher = dispatcher(Arc::clone(&notifier), 60);
            let events = [breach(BreachKind::ExposureBreach, Some("Party B"))];

            dispatcher.dispatch_at(&events, at(0)).await;
            let report = dispatcher.dispatch_at(&events, at(60)).await;

            assert_eq!(report.delivered, 1);
            assert_eq!(notifier.count(), 2);
        }

        #[tokio::test]
        async fn distinct_keys_are_independent() {
            let notifier = Arc::new(RecordingNotifier::default());
            let dispatcher = dispatcher(Arc::clone(&notifier), 60);

            let report = dispatcher
                .dispatch_at(
                    &[
                        breach(BreachKind::ExposureBreach, Some("Party A")),
                        breach(BreachKind::ExposureBreach, Some("Party B")),
                        breach(BreachKind::CountBreach, None),
                    ],
                    at(0),
                )
                .await;

            assert_eq!(report.delivered, 3);
        }

        #[tokio::test]
        async fn duplicate_key_in_one_batch_is_suppressed() {
            let notifier = Arc::new(RecordingNotifier::default());
            let dispatcher = dispatcher(Arc::clone(&notifier), 60);
            let event = breach(BreachKind::CountBreach, None);

            let report = dispatcher
                .dispatch_at(&[event.clone(), event], at(0))
                .await;

            assert_eq!(report.delivered, 1);
            assert_eq!(report.suppressed, 1);
        }

        #[tokio::test]
        async fn reset_clears_cooldowns() {
            let notifier = Arc::new(RecordingNotifier::default());
            let dispatcher = dispatcher(Arc::clone(&notifier), 60);
            let events = [breach(BreachKind::CountBreach, None)];

            dispatcher.dispatch_at(&events, at(0)).await;
            dispatcher.reset();
            let report = dispatcher.dispatch_at(&events, at(1)).await;

            assert_eq!(report.delivered, 1);
        }
    }

    mod failures {
        use super::*;

        #[tokio::test]
        async fn failure_is_reported_not_raised() {
            let notifier = Arc::new(RecordingNotifier::failing());
            let dispatcher = dispatcher(Arc::clone(&notifier), 60);

            let report = dispatcher
                .dispatch_at(&[breach(BreachKind::CountBreach, None)], at(0))
                .await;

            assert_eq!(report.attempted, 1);
            assert_eq!(report.delivered, 0);
            assert!(report.has_failures());
            assert_eq!(
                report.failures[0].1,
                TransportError::delivery("smtp unavailable")
            );
        }

        #[tokio::test]
        async fn failed_attempt_still_starts_cooldown() {
            let notifier = Arc::new(RecordingNotifier::failing());
            let dispatcher = dispatcher(Arc::clone(&notifier), 60);
            let events = [breach(BreachKind::CountBreach, None)];

            dispatcher.dispatch_at(&events, at(0)).await;
            let report = dispatcher.dispatch_at(&events, at(30)).await;

            assert_eq!(report.suppressed, 1);
            assert_eq!(notifier.count(), 1);
        }
    }

    mod recent {
        use super::*;

        #[tokio::test]
        async fn records_most_recent_first() {
            let notifier = Arc::new(RecordingNotifier::default());
            let dispatcher = dispatcher(Arc::clone(&notifier), 60);

            dispatcher
                .dispatch_at(&[breach(BreachKind::CountBreach, None)], at(0))
                .await;
            dispatcher
                .dispatch_at(&[breach(BreachKind::SingleTradeBreach, None)], at(1))
                .await;

            let recent = dispatcher.recent();
            assert_eq!(recent.len(), 2);
            assert_eq!(recent[0].breach.kind, BreachKind::SingleTradeBreach);
            assert_eq!(recent[0].outcome, AlertOutcome::Delivered);
        }

        #[tokio::test]
        async fn capacity_is_bounded() {
            let notifier = Arc::new(RecordingNotifier::default());
            let dispatcher = AlertDispatcher::new(
                notifier,
                DispatcherConfig::with_cooldown(Duration::ZERO).with_recent_capacity(2),
            );
            let events = [breach(BreachKind::CountBreach, None)];

            for secs in 0..5 {
                dispatcher.dispatch_at(&events, at(secs)).await;
            }

            let recent = dispatcher.recent();
            assert_eq!(recent.len(), 2);
            assert_eq!(recent[0].attempted_at, at(4));
        }

        #[tokio::test]
        async fn failed_outcome_serializes_with_reason() {
            let notifier = Arc::new(RecordingNotifier::failing());
            let dispatcher = dispatcher(notifier, 60);
            dispatcher
                .dispatch_at(&[breach(BreachKind::CountBreach, None)], at(0))
                .await;

            let json = serde_json::to_value(&dispatcher.recent()[0]).unwrap();
            assert_eq!(json["outcome"]["status"], "FAILED");
            assert!(json["outcome"]["reason"].as_str().unwrap().contains("smtp"));
        }
    }
}
