//! # Settlement Fails
//!
//! Ageing report of trades that did not settle on their contractual date:
//! every `FAILED` trade, plus `PENDING` trades whose settlement date has
//! already passed.

use crate::domain::entities::Trade;
use crate::domain::errors::DomainResult;
use crate::domain::value_objects::{SettlementStatus, TradeId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the fails report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementFail {
    /// Failed or overdue trade.
    pub trade_id: TradeId,
    /// Counterparty name.
    pub counterparty: String,
    /// Contractual settlement date.
    pub settlement_date: NaiveDate,
    /// Days past the settlement date, never negative.
    pub fail_days: i64,
    /// Cash amount at stake.
    pub net_money: Decimal,
    /// Current status (`FAILED` or `PENDING`).
    pub status: SettlementStatus,
}

/// Builds the fails report as of `as_of`.
///
/// Rows are ordered by fail days descending, then by absolute net money
/// descending, then by trade id.
///
/// # Errors
///
/// Returns `DomainError::Arithmetic` if a trade's net money overflows.
pub fn settlement_fails(trades: &[Trade], as_of: NaiveDate) -> DomainResult<Vec<SettlementFail>> {
    let mut fails = trades
        .iter()
        .filter(|t| match t.status() {
            SettlementStatus::Failed => true,
            SettlementStatus::Pending => t.settlement_date() < as_of,
            SettlementStatus::Settled | SettlementStatus::Cancelled => false,
        })
        .map(|t| {
            Ok(SettlementFail {
                trade_id: t.id(),
                counterparty: t.counterparty_name().to_string(),
                settlement_date: t.settlement_date(),
                fail_days: (as_of - t.settlement_date()).num_days().max(0),
                net_money: t.net_money()?,
                status: t.status(),
            })
        })
        .collect::<DomainResult<Vec<_>>>()?;

    fails.sort_by(|a, b| {
        b.fail_days
            .cmp(&a.fail_days)
            .then_with(|| b.net_money.abs().cmp(&a.net_money.abs()))
            .then_with(|| a.trade_id.cmp(&b.trade_id))
    });

    Ok(fails)
}
