//! # Settlement Risk
//!
//! Trade settlement risk engine.
//!
//! Tracks booked trades through their settlement lifecycle, aggregates the
//! unsettled book into exposure metrics, evaluates those metrics against
//! versioned risk limits and dispatches breach alerts with a per-breach
//! cool-down.
//!
//! # Architecture
//!
//! - [`domain`]: trades, settlement status machine, risk aggregation and
//!   threshold evaluation
//! - [`application`]: the [`RiskEngine`](application::services::RiskEngine),
//!   alert dispatch and the periodic evaluation loop
//! - [`infrastructure`]: in-memory trade store, SMTP and log notifiers,
//!   tracing setup
//! - [`api`]: REST endpoints
//! - [`config`]: layered configuration (defaults, TOML file, environment)
//!
//! # Example
//!
//! ```
//! use settlement_risk::domain::entities::TradeBuilder;
//! use settlement_risk::domain::services::RiskAggregator;
//! use settlement_risk::domain::value_objects::{OrderSide, TradeId};
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//!
//! let trade = TradeBuilder::new(
//!     TradeId::new(1),
//!     OrderSide::Buy,
//!     Decimal::new(100, 0),
//!     Decimal::new(5025, 2),
//! )
//! .counterparty("0005", "Party A")
//! .dates(
//!     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
//! )
//! .try_build()
//! .unwrap();
//!
//! let metrics = RiskAggregator::compute(&[trade]).unwrap();
//! assert_eq!(metrics.unsettled_count, 1);
//! assert_eq!(metrics.exposure_to("Party A"), Decimal::new(5025, 0));
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
