//! # Risk Parameters
//!
//! Threshold limits for settlement risk, and the named, versioned
//! configuration object that activates them.
//!
//! [`RiskLimits`] is the plain, validated set of three limits a caller
//! supplies. [`RiskParameters`] wraps limits with a name, a version and an
//! activation timestamp; it is immutable, and replacing limits produces a
//! new version rather than mutating the active one.
//!
//! # Examples
//!
//! ```
//! use settlement_risk::domain::entities::{RiskLimits, RiskParameters};
//! use rust_decimal::Decimal;
//!
//! let limits = RiskLimits::new(150, Decimal::new(1_000_000, 0), Decimal::new(750_000, 0)).unwrap();
//! let v1 = RiskParameters::initial("default", limits);
//! let v2 = v1.supersede(limits);
//!
//! assert_eq!(v1.version(), 1);
//! assert_eq!(v2.version(), 2);
//! assert_eq!(v2.name(), "default");
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three settlement risk limits.
///
/// # Invariants
///
/// - every limit is strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskLimits {
    max_unsettled_trades: u64,
    max_counterparty_exposure: Decimal,
    max_single_trade_value: Decimal,
}

impl RiskLimits {
    /// Creates validated limits.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRiskParameters` if any limit is not
    /// strictly positive.
    pub fn new(
        max_unsettled_trades: u64,
        max_counterparty_exposure: Decimal,
        max_single_trade_value: Decimal,
    ) -> DomainResult<Self> {
        if max_unsettled_trades == 0 {
            return Err(DomainError::invalid_risk_parameters(
                "max_unsettled_trades must be greater than zero",
            ));
        }
        if max_counterparty_exposure <= Decimal::ZERO {
            return Err(DomainError::invalid_risk_parameters(
                "max_counterparty_exposure must be greater than zero",
            ));
        }
        if max_single_trade_value <= Decimal::ZERO {
            return Err(DomainError::invalid_risk_parameters(
                "max_single_trade_value must be greater than zero",
            ));
        }
        Ok(Self {
            max_unsettled_trades,
            max_counterparty_exposure,
            max_single_trade_value,
        })
    }

    /// Maximum number of unsettled trades.
    #[inline]
    #[must_use]
    pub fn max_unsettled_trades(&self) -> u64 {
        self.max_unsettled_trades
    }

    /// Maximum aggregate unsettled exposure to one counterparty.
    #[inline]
    #[must_use]
    pub fn max_counterparty_exposure(&self) -> Decimal {
        self.max_counterparty_exposure
    }

    /// Maximum notional of a single unsettled trade.
    #[inline]
    #[must_use]
    pub fn max_single_trade_value(&self) -> Decimal {
        self.max_single_trade_value
    }
}

/// A named, versioned, immutable activation of [`RiskLimits`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskParameters {
    name: String,
    version: u64,
    #[serde(flatten)]
    limits: RiskLimits,
    activated_at: Timestamp,
}

impl RiskParameters {
    /// Creates version 1 of a parameter set.
    #[must_use]
    pub fn initial(name: impl Into<String>, limits: RiskLimits) -> Self {
        Self {
            name: name.into(),
            version: 1,
            limits,
            activated_at: Timestamp::now(),
        }
    }

    /// Returns the next version carrying `limits`, activated now.
    #[must_use]
    pub fn supersede(&self, limits: RiskLimits) -> Self {
        Self {
            name: self.name.clone(),
            version: self.version.saturating_add(1),
            limits,
            activated_at: Timestamp::now(),
        }
    }

    /// Parameter set name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version, starting at 1.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The limits of this version.
    #[inline]
    #[must_use]
    pub fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    /// When this version became active.
    #[inline]
    #[must_use]
    pub fn activated_at(&self) -> Timestamp {
        self.activated_at
    }
}

impl fmt::Display for RiskParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} v{} (max_unsettled={}, max_cp_exposure={}, max_single={})",
            self.name,
            self.version,
            self.limits.max_unsettled_trades,
            self.limits.max_counterparty_exposure,
            self.limits.max_single_trade_value
        )
    }
}
