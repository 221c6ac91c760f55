//! # Domain Entities
//!
//! Records owned by the engine.
//!
//! - [`Trade`]: booked securities trade, built with [`TradeBuilder`]
//! - [`RiskParameters`]: named, versioned activation of [`RiskLimits`]

pub mod risk_parameters;
pub mod trade;

pub use risk_parameters::{RiskLimits, RiskParameters};
pub use trade::{DEFAULT_CURRENCY, Trade, TradeBuilder};
