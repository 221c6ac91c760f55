//! # Infrastructure Layer
//!
//! - [`persistence`]: trade store implementations
//! - [`notifications`]: SMTP and log notifiers
//! - [`telemetry`]: tracing subscriber setup

pub mod notifications;
pub mod persistence;
pub mod telemetry;
