//! # Breach Events
//!
//! Threshold violations detected by the
//! [`ThresholdPolicy`](crate::domain::services::ThresholdPolicy).
//!
//! A [`BreachEvent`] is a transient value: the policy creates it, the alert
//! dispatcher consumes it, and nothing persists it. Events are deduplicated
//! on their [`BreachKey`], the `(kind, counterparty)` pair.

use crate::domain::value_objects::{TradeId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which limit was breached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreachKind {
    /// Too many unsettled trades.
    CountBreach,
    /// Unsettled exposure to one counterparty above its limit.
    ExposureBreach,
    /// A single unsettled trade above the single-trade limit.
    SingleTradeBreach,
}

impl BreachKind {
    /// Human-readable description of the limit.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::CountBreach => "unsettled trade count",
            Self::ExposureBreach => "counterparty exposure",
            Self::SingleTradeBreach => "single trade value",
        }
    }
}

impl fmt::Display for BreachKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CountBreach => "COUNT_BREACH",
            Self::ExposureBreach => "EXPOSURE_BREACH",
            Self::SingleTradeBreach => "SINGLE_TRADE_BREACH",
        };
        write!(f, "{s}")
    }
}

/// Deduplication key of a breach: `(kind, counterparty)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BreachKey {
    /// Breached limit.
    pub kind: BreachKind,
    /// Counterparty for exposure breaches.
    pub counterparty: Option<String>,
}

impl fmt::Display for BreachKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.counterparty {
            Some(counterparty) => write!(f, "{}:{}", self.kind, counterparty),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// One detected threshold violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreachEvent {
    /// Breached limit.
    pub kind: BreachKind,
    /// Observed value (count or notional).
    pub observed: Decimal,
    /// Configured limit.
    pub limit: Decimal,
    /// When the breach was detected (the metrics timestamp).
    pub detected_at: Timestamp,
    /// Counterparty for exposure breaches.
    pub counterparty: Option<String>,
    /// Largest trade for single-trade breaches.
    pub trade_id: Option<TradeId>,
    /// Version of the risk parameters evaluated against.
    pub parameters_version: u64,
}

impl BreachEvent {
    /// Returns the deduplication key.
    #[must_use]
    pub fn key(&self) -> BreachKey {
        BreachKey {
            kind: self.kind,
            counterparty: self.counterparty.clone(),
        }
    }

    /// Amount by which the observed value exceeds the limit.
    #[must_use]
    pub fn excess(&self) -> Decimal {
        self.observed.saturating_sub(self.limit)
    }

    /// Alert subject line.
    #[must_use]
    pub fn subject(&self) -> String {
        match &self.counterparty {
            Some(counterparty) => format!(
                "Settlement risk alert: {} limit breached for {}",
                self.kind.description(),
                counterparty
            ),
            None => format!(
                "Settlement risk alert: {} limit breached",
                self.kind.description()
            ),
        }
    }

    /// Plain-text alert body.
    #[must_use]
    pub fn body(&self) -> String {
        let mut body = format!(
            "Breach: {}\nObserved: {}\nLimit: {}\nExcess: {}\nDetected at: {}\nRisk parameters version: {}\n",
            self.kind,
            self.observed,
            self.limit,
            self.excess(),
            self.detected_at,
            self.parameters_version
        );
        if let Some(counterparty) = &self.counterparty {
            body.push_str(&format!("Counterparty: {counterparty}\n"));
        }
        if let Some(trade_id) = self.trade_id {
            body.push_str(&format!("Trade: {trade_id}\n"));
        }
        body
    }
}

impl fmt::Display for BreachEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} observed={} limit={}",
            self.key(),
            self.observed,
            self.limit
        )
    }
}
