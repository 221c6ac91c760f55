//! # Domain Enums
//!
//! - [`OrderSide`]: the buy/sell indicator of a booked trade
//! - [`ParseEnumError`]: error for parsing enum values from strings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Buy/sell indicator of a trade.
///
/// Parsing accepts the single-letter forms used on trade tickets.
///
/// # Examples
///
/// ```
/// use settlement_risk::domain::value_objects::enums::OrderSide;
///
/// let side: OrderSide = "B".parse().unwrap();
/// assert_eq!(side, OrderSide::Buy);
/// assert_eq!(side.to_string(), "BUY");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    /// The account receives securities and delivers cash.
    Buy,
    /// The account delivers securities and receives cash.
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for OrderSide {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" | "B" => Ok(Self::Buy),
            "SELL" | "S" => Ok(Self::Sell),
            _ => Err(ParseEnumError::InvalidValue("OrderSide", s.to_string())),
        }
    }
}

/// Error for parsing enum values from strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseEnumError {
    /// Not a recognised value for the named enum.
    #[error("invalid {0} value: '{1}'")]
    InvalidValue(&'static str, String),
}
