//! # Application Layer
//!
//! Use cases on top of the domain: booking trades, applying status changes,
//! evaluating risk and dispatching alerts.

pub mod error;
pub mod services;
