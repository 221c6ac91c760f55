//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! - [`RiskEngine`]: facade over the trade store, policy and dispatcher
//! - [`AlertDispatcher`]: cool-down aware breach notification
//! - [`run_evaluation_loop`]: periodic evaluate-and-dispatch task

pub mod alert_dispatcher;
pub mod evaluation_loop;
pub mod risk_engine;

pub use alert_dispatcher::{
    AlertDispatcher, AlertOutcome, AlertRecord, DispatchReport, DispatcherConfig, Notifier,
};
pub use evaluation_loop::run_evaluation_loop;
pub use risk_engine::{CycleReport, Evaluation, RiskEngine, RiskView, TradeFilter};
