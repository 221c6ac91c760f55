//! # Timestamp Value Object
//!
//! UTC instant used to stamp risk metrics, breach events, status transitions
//! and alert cool-downs.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A UTC timestamp.
///
/// Serialized as RFC 3339.
///
/// # Examples
///
/// ```
/// use settlement_risk::domain::value_objects::timestamp::Timestamp;
///
/// let start = Timestamp::from_secs(1_000).unwrap();
/// let end = Timestamp::from_secs(1_090).unwrap();
///
/// assert_eq!(end.elapsed_since(&start).as_secs(), 90);
/// assert!(start < end);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix seconds, `None` if out of range.
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Unix seconds.
    #[inline]
    #[must_use]
    pub fn timestamp_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Returns the time elapsed from `earlier` to this timestamp.
    ///
    /// Saturates to zero when `earlier` is actually later (clock skew).
    #[must_use]
    pub fn elapsed_since(&self, earlier: &Self) -> Duration {
        (self.0 - earlier.0).to_std().unwrap_or(Duration::ZERO)
    }

    /// Returns the UTC calendar date of this timestamp.
    #[inline]
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
