//! # Settlement Status
//!
//! Settlement lifecycle states of a booked trade.
//!
//! Which transitions between these states are legal is decided by the
//! [`SettlementStatusTracker`](crate::domain::services::SettlementStatusTracker);
//! this module only names the states.
//!
//! ```text
//! Pending ─┬→ Settled
//!          ├→ Failed
//!          └→ Cancelled
//! ```

use crate::domain::value_objects::enums::ParseEnumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Settlement status of a trade.
///
/// # Terminal States
///
/// - [`Settled`](SettlementStatus::Settled): securities and cash exchanged
/// - [`Failed`](SettlementStatus::Failed): settlement did not complete
/// - [`Cancelled`](SettlementStatus::Cancelled): cancelled before settling
///
/// # Examples
///
/// ```
/// use settlement_risk::domain::value_objects::SettlementStatus;
///
/// assert!(SettlementStatus::Pending.is_unsettled());
/// assert!(SettlementStatus::Settled.is_terminal());
/// assert_eq!(SettlementStatus::default(), SettlementStatus::Pending);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementStatus {
    /// Booked and awaiting settlement.
    #[default]
    Pending,

    /// Settlement completed (terminal).
    Settled,

    /// Settlement failed (terminal).
    Failed,

    /// Trade cancelled before settlement (terminal).
    Cancelled,
}

impl SettlementStatus {
    /// All statuses, in declaration order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Settled, Self::Failed, Self::Cancelled];

    /// Returns true if this is a terminal state.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Settled | Self::Failed | Self::Cancelled)
    }

    /// Returns true if the trade still carries settlement risk.
    #[inline]
    #[must_use]
    pub const fn is_unsettled(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Settled => "SETTLED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

impl FromStr for SettlementStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            // the dashboard feed labels pending trades "unsettled"
            "PENDING" | "UNSETTLED" => Ok(Self::Pending),
            "SETTLED" => Ok(Self::Settled),
            "FAILED" => Ok(Self::Failed),
            "CANCELLED" | "CANCELED" => Ok(Self::Cancelled),
            _ => Err(ParseEnumError::InvalidValue(
                "SettlementStatus",
                s.to_string(),
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod terminal {
        use super::*;

        #[test]
        fn pending_is_not_terminal() {
            assert!(!SettlementStatus::Pending.is_terminal());
            assert!(SettlementStatus::Pending.is_unsettled());
        }

        #[test]
        fn settled_failed_cancelled_are_terminal() {
            for status in [
                SettlementStatus::Settled,
                SettlementStatus::Failed,
                SettlementStatus::Cancelled,
            ] {
                assert!(status.is_terminal());
                assert!(!status.is_unsettled());
            }
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn display_formats() {
            assert_eq!(SettlementStatus::Pending.to_string(), "PENDING");
            assert_eq!(SettlementStatus::Settled.to_string(), "SETTLED");
            assert_eq!(SettlementStatus::Failed.to_string(), "FAILED");
            assert_eq!(SettlementStatus::Cancelled.to_string(), "CANCELLED");
        }

        #[test]
        fn from_str_is_case_insensitive() {
            assert_eq!(
                "settled".parse::<SettlementStatus>().unwrap(),
                SettlementStatus::Settled
            );
            assert_eq!(
                "unsettled".parse::<SettlementStatus>().unwrap(),
                SettlementStatus::Pending
            );
            assert_eq!(
                "Canceled".parse::<SettlementStatus>().unwrap(),
                SettlementStatus::Cancelled
            );
        }

        #[test]
        fn from_str_invalid() {
            assert!("unknown".parse::<SettlementStatus>().is_err());
        }

        #[test]
        fn display_round_trips_through_from_str() {
            for status in SettlementStatus::ALL {
                assert_eq!(status.to_string().parse::<SettlementStatus>().unwrap(), status);
            }
        }
    }

    mod serde {
        use super::*;

        #[test]
        fn serializes_screaming_snake_case() {
            assert_eq!(
                serde_json::to_string(&SettlementStatus::Cancelled).unwrap(),
                "\"CANCELLED\""
            );
            let status: SettlementStatus = serde_json::from_str("\"FAILED\"").unwrap();
            assert_eq!(status, SettlementStatus::Failed);
        }
    }
}
