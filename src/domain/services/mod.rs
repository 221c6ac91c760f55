//! # Domain Services
//!
//! Stateless calculators and the state machine that sit between trades and
//! alerts.
//!
//! ## Services
//!
//! - [`SettlementStatusTracker`]: settlement status state machine
//! - [`RiskAggregator`]: trade snapshot → [`RiskMetrics`]
//! - [`ThresholdPolicy`]: active parameters and breach evaluation
//! - [`settlement_fails`]: ageing report of failed and overdue trades

pub mod risk_aggregator;
pub mod settlement_fails;
pub mod settlement_tracker;
pub mod threshold_policy;

pub use risk_aggregator::{RiskAggregator, RiskMetrics, SideSummary};
pub use settlement_fails::{SettlementFail, settlement_fails};
pub use settlement_tracker::SettlementStatusTracker;
pub use threshold_policy::ThresholdPolicy;
