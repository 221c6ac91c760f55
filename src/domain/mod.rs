//! # Domain Layer
//!
//! Core settlement risk logic, free of I/O.
//!
//! - [`value_objects`]: identifiers, statuses, timestamps, checked arithmetic
//! - [`entities`]: trades and risk parameters
//! - [`events`]: status changes and threshold breaches
//! - [`services`]: state machine, aggregation, threshold evaluation
//! - [`errors`]: the [`DomainError`](errors::DomainError) type

pub mod entities;
pub mod errors;
pub mod events;
pub mod services;
pub mod value_objects;
