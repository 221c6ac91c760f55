//! # Domain Events
//!
//! ## Settlement Events
//!
//! - [`SettlementStatusChanged`]: accepted status transition (audit trail)
//!
//! ## Risk Events
//!
//! - [`BreachEvent`]: threshold violation detected by the policy
//! - [`BreachKind`]: which limit was breached
//! - [`BreachKey`]: `(kind, counterparty)` deduplication key

pub mod breach_events;
pub mod settlement_events;

pub use breach_events::{BreachEvent, BreachKey, BreachKind};
pub use settlement_events::SettlementStatusChanged;
