//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`TradeId`]: numeric trade identifier
//! - [`CounterpartyId`]: counterparty DTC number
//! - [`EventId`]: audit event identifier
//!
//! ## Arithmetic
//!
//! - [`ArithmeticError`]: Error type for arithmetic failures
//! - [`CheckedArithmetic`]: Trait for safe arithmetic operations
//!
//! ## Domain Enums
//!
//! - [`OrderSide`]: Buy or Sell
//! - [`SettlementStatus`]: settlement lifecycle states

pub mod arithmetic;
pub mod enums;
pub mod ids;
pub mod settlement_status;
pub mod timestamp;

pub use arithmetic::{ArithmeticError, ArithmeticResult, CheckedArithmetic, checked_sum};
pub use enums::{OrderSide, ParseEnumError};
pub use ids::{CounterpartyId, EventId, TradeId};
pub use settlement_status::SettlementStatus;
pub use timestamp::Timestamp;
