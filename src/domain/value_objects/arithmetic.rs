//! # Checked Arithmetic
//!
//! Traits and utilities for safe arithmetic on notional amounts.
//!
//! Trade amounts are computed with these helpers so an overflow surfaces as
//! an [`ArithmeticError`] rather than a panic.
//!
//! # Examples
//!
//! ```
//! use settlement_risk::domain::value_objects::arithmetic::CheckedArithmetic;
//! use rust_decimal::Decimal;
//!
//! let quantity = Decimal::new(100, 0);
//! let price = Decimal::new(5025, 2);
//! assert_eq!(quantity.safe_mul(price), Ok(Decimal::new(5025, 0)));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Overflow or underflow in an amount computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    /// Arithmetic operation resulted in overflow.
    #[error("arithmetic overflow")]
    Overflow,

    /// Arithmetic operation resulted in underflow.
    #[error("arithmetic underflow")]
    Underflow,
}

/// Result type for arithmetic operations.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Checked arithmetic returning [`ArithmeticError`] instead of panicking.
pub trait CheckedArithmetic: Sized {
    /// Safely add two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely subtract two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Underflow` if the result would underflow.
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely multiply two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self>;
}

impl CheckedArithmetic for Decimal {
    #[inline]
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_add(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_sub(rhs).ok_or(ArithmeticError::Underflow)
    }

    #[inline]
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
    }
}

/// Sums decimal amounts, failing on overflow instead of panicking.
///
/// # Errors
///
/// Returns `ArithmeticError::Overflow` if the running total overflows.
///
/// # Examples
///
/// ```
/// use settlement_risk::domain::value_objects::arithmetic::checked_sum;
/// use rust_decimal::Decimal;
///
/// let total = checked_sum([Decimal::ONE, Decimal::TWO]).unwrap();
/// assert_eq!(total, Decimal::new(3, 0));
/// ```
pub fn checked_sum<I>(amounts: I) -> ArithmeticResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.safe_add(amount))
}
