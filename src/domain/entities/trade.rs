//! # Trade Entity
//!
//! A securities trade awaiting or having completed settlement.
//!
//! Trades are immutable value records: the only attribute that ever changes
//! after booking is the settlement status, and that change is performed by
//! the trade store after the
//! [`SettlementStatusTracker`](crate::domain::services::SettlementStatusTracker)
//! accepts it.
//!
//! # Examples
//!
//! ```
//! use settlement_risk::domain::entities::TradeBuilder;
//! use settlement_risk::domain::value_objects::{OrderSide, SettlementStatus, TradeId};
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//!
//! let trade = TradeBuilder::new(
//!     TradeId::new(1),
//!     OrderSide::Buy,
//!     Decimal::new(100, 0),
//!     Decimal::new(5025, 2),
//! )
//! .counterparty("0005", "Party A")
//! .dates(
//!     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
//! )
//! .try_build()
//! .unwrap();
//!
//! assert_eq!(trade.status(), SettlementStatus::Pending);
//! assert_eq!(trade.notional().unwrap(), Decimal::new(5025, 0));
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    ArithmeticResult, CheckedArithmetic, CounterpartyId, OrderSide, SettlementStatus, TradeId,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default settlement currency.
pub const DEFAULT_CURRENCY: &str = "USD";

/// A booked securities trade.
///
/// # Invariants
///
/// - `settlement_date >= trade_date`
/// - `quantity >= 0` and `price >= 0`
/// - `fees >= 0`
/// - `counterparty_name` is not blank
/// - `quantity × price` is representable
///
/// Deserialization goes through the same validation as
/// [`TradeBuilder::try_build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TradeRecord")]
pub struct Trade {
    id: TradeId,
    #[serde(rename = "buy_sell_indicator")]
    side: OrderSide,
    product_type: String,
    cusip: String,
    isin: String,
    trade_date: NaiveDate,
    settlement_date: NaiveDate,
    quantity: Decimal,
    price: Decimal,
    account_number: String,
    #[serde(rename = "counterparty_dtc_number")]
    counterparty_id: CounterpartyId,
    counterparty_name: String,
    currency: String,
    accrued_interest: Decimal,
    fees: Decimal,
    settlement_location: String,
    #[serde(rename = "settlement_status")]
    status: SettlementStatus,
}

impl Trade {
    /// Returns the trade identifier.
    #[inline]
    #[must_use]
    pub fn id(&self) -> TradeId {
        self.id
    }

    /// Returns the buy/sell indicator.
    #[inline]
    #[must_use]
    pub fn side(&self) -> OrderSide {
        self.side
    }

    /// Returns the product type (e.g. `EQUITY`, `CORP`).
    #[inline]
    #[must_use]
    pub fn product_type(&self) -> &str {
        &self.product_type
    }

    /// Returns the CUSIP.
    #[inline]
    #[must_use]
    pub fn cusip(&self) -> &str {
        &self.cusip
    }

    /// Returns the ISIN.
    #[inline]
    #[must_use]
    pub fn isin(&self) -> &str {
        &self.isin
    }

    /// Returns the trade date.
    #[inline]
    #[must_use]
    pub fn trade_date(&self) -> NaiveDate {
        self.trade_date
    }

    /// Returns the contractual settlement date.
    #[inline]
    #[must_use]
    pub fn settlement_date(&self) -> NaiveDate {
        self.settlement_date
    }

    /// Returns the quantity.
    #[inline]
    #[must_use]
    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Returns the price.
    #[inline]
    #[must_use]
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Returns the account number.
    #[inline]
    #[must_use]
    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    /// Returns the counterparty DTC number.
    #[inline]
    #[must_use]
    pub fn counterparty_id(&self) -> &CounterpartyId {
        &self.counterparty_id
    }

    /// Returns the counterparty name.
    #[inline]
    #[must_use]
    pub fn counterparty_name(&self) -> &str {
        &self.counterparty_name
    }

    /// Returns the ISO currency code.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns the accrued interest.
    #[inline]
    #[must_use]
    pub fn accrued_interest(&self) -> Decimal {
        self.accrued_interest
    }

    /// Returns the fees.
    #[inline]
    #[must_use]
    pub fn fees(&self) -> Decimal {
        self.fees
    }

    /// Returns the settlement location (depository).
    #[inline]
    #[must_use]
    pub fn settlement_location(&self) -> &str {
        &self.settlement_location
    }

    /// Returns the settlement status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> SettlementStatus {
        self.status
    }

    /// Returns true while the trade is unsettled.
    #[inline]
    #[must_use]
    pub fn is_unsettled(&self) -> bool {
        self.status.is_unsettled()
    }

    /// Gross notional: `quantity × price`.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the product is not representable.
    pub fn notional(&self) -> ArithmeticResult<Decimal> {
        self.quantity.safe_mul(self.price)
    }

    /// Cash amount that changes hands at settlement.
    ///
    /// ```text
    /// BUY:  notional + accrued_interest + fees
    /// SELL: notional + accrued_interest - fees
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an `ArithmeticError` on overflow.
    pub fn net_money(&self) -> ArithmeticResult<Decimal> {
        let principal = self.notional()?.safe_add(self.accrued_interest)?;
        match self.side {
            OrderSide::Buy => principal.safe_add(self.fees),
            OrderSide::Sell => principal.safe_sub(self.fees),
        }
    }

    /// Returns a copy carrying a new status.
    ///
    /// Only the trade store calls this, after the tracker has accepted the
    /// transition.
    #[must_use]
    pub(crate) fn with_status(&self, status: SettlementStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    fn validate(&self) -> DomainResult<()> {
        if self.quantity < Decimal::ZERO {
            return Err(DomainError::InvalidQuantity(format!(
                "quantity must be non-negative, got {}",
                self.quantity
            )));
        }
        if self.price < Decimal::ZERO {
            return Err(DomainError::InvalidPrice(format!(
                "price must be non-negative, got {}",
                self.price
            )));
        }
        if self.fees < Decimal::ZERO {
            return Err(DomainError::invalid_trade("fees must be non-negative"));
        }
        if self.settlement_date < self.trade_date {
            return Err(DomainError::InvalidSettlementDate {
                trade_date: self.trade_date,
                settlement_date: self.settlement_date,
            });
        }
        if self.counterparty_name.trim().is_empty() {
            return Err(DomainError::invalid_trade("counterparty name is required"));
        }
        if self.currency.trim().is_empty() {
            return Err(DomainError::invalid_trade("currency is required"));
        }
        self.net_money()
            .map_err(|_| DomainError::invalid_trade("notional is not representable"))?;
        Ok(())
    }
}

/// Unvalidated wire form of a [`Trade`].
#[derive(Deserialize)]
struct TradeRecord {
    id: TradeId,
    buy_sell_indicator: OrderSide,
    product_type: String,
    cusip: String,
    isin: String,
    trade_date: NaiveDate,
    settlement_date: NaiveDate,
    quantity: Decimal,
    price: Decimal,
    account_number: String,
    counterparty_dtc_number: CounterpartyId,
    counterparty_name: String,
    currency: String,
    accrued_interest: Decimal,
    fees: Decimal,
    settlement_location: String,
    settlement_status: SettlementStatus,
}

impl TryFrom<TradeRecord> for Trade {
    type Error = DomainError;

    fn try_from(record: TradeRecord) -> DomainResult<Self> {
        let trade = Self {
            id: record.id,
            side: record.buy_sell_indicator,
            product_type: record.product_type,
            cusip: record.cusip,
            isin: record.isin,
            trade_date: record.trade_date,
            settlement_date: record.settlement_date,
            quantity: record.quantity,
            price: record.price,
            account_number: record.account_number,
            counterparty_id: record.counterparty_dtc_number,
            counterparty_name: record.counterparty_name,
            currency: record.currency,
            accrued_interest: record.accrued_interest,
            fees: record.fees,
            settlement_location: record.settlement_location,
            status: record.settlement_status,
        };
        trade.validate()?;
        Ok(trade)
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trade({} {} {} @ {} vs {} [{}])",
            self.id, self.side, self.quantity, self.price, self.counterparty_name, self.status
        )
    }
}

/// Builder for constructing validated [`Trade`] instances.
///
/// New trades start [`Pending`](SettlementStatus::Pending). The
/// [`status`](Self::status) setter exists for reconstructing trades from
/// trusted storage and should not be used for fresh bookings.
#[derive(Debug, Clone)]
pub struct TradeBuilder {
    trade: Trade,
}

impl TradeBuilder {
    /// Creates a new builder with the required economic fields.
    ///
    /// Dates default to today (UTC); the currency defaults to
    /// [`DEFAULT_CURRENCY`].
    #[must_use]
    pub fn new(id: TradeId, side: OrderSide, quantity: Decimal, price: Decimal) -> Self {
        let today = chrono::Utc::now().date_naive();
        Self {
            trade: Trade {
                id,
                side,
                product_type: String::new(),
                cusip: String::new(),
                isin: String::new(),
                trade_date: today,
                settlement_date: today,
                quantity,
                price,
                account_number: String::new(),
                counterparty_id: CounterpartyId::new(""),
                counterparty_name: String::new(),
                currency: DEFAULT_CURRENCY.to_string(),
                accrued_interest: Decimal::ZERO,
                fees: Decimal::ZERO,
                settlement_location: String::new(),
                status: SettlementStatus::Pending,
            },
        }
    }

    /// Sets the counterparty DTC number and name.
    #[must_use]
    pub fn counterparty(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.trade.counterparty_id = CounterpartyId::new(id);
        self.trade.counterparty_name = name.into();
        self
    }

    /// Sets the trade and settlement dates.
    #[must_use]
    pub fn dates(mut self, trade_date: NaiveDate, settlement_date: NaiveDate) -> Self {
        self.trade.trade_date = trade_date;
        self.trade.settlement_date = settlement_date;
        self
    }

    /// Sets the product type.
    #[must_use]
    pub fn product_type(mut self, product_type: impl Into<String>) -> Self {
        self.trade.product_type = product_type.into();
        self
    }

    /// Sets the CUSIP and ISIN security identifiers.
    #[must_use]
    pub fn security(mut self, cusip: impl Into<String>, isin: impl Into<String>) -> Self {
        self.trade.cusip = cusip.into();
        self.trade.isin = isin.into();
        self
    }

    /// Sets the account number.
    #[must_use]
    pub fn account_number(mut self, account_number: impl Into<String>) -> Self {
        self.trade.account_number = account_number.into();
        self
    }

    /// Sets the currency code.
    #[must_use]
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.trade.currency = currency.into();
        self
    }

    /// Sets accrued interest.
    #[must_use]
    pub fn accrued_interest(mut self, accrued_interest: Decimal) -> Self {
        self.trade.accrued_interest = accrued_interest;
        self
    }

    /// Sets fees.
    #[must_use]
    pub fn fees(mut self, fees: Decimal) -> Self {
        self.trade.fees = fees;
        self
    }

    /// Sets the settlement location.
    #[must_use]
    pub fn settlement_location(mut self, location: impl Into<String>) -> Self {
        self.trade.settlement_location = location.into();
        self
    }

    /// Sets the status of a trade reconstructed from storage.
    #[must_use]
    pub fn status(mut self, status: SettlementStatus) -> Self {
        self.trade.status = status;
        self
    }

    /// Builds the trade with validation.
    ///
    /// # Errors
    ///
    /// - `DomainError::InvalidQuantity` / `InvalidPrice` for negative values
    /// - `DomainError::InvalidSettlementDate` if settlement precedes trade date
    /// - `DomainError::InvalidTrade` for blank counterparty or currency,
    ///   negative fees, or amounts that are not representable
    pub fn try_build(self) -> DomainResult<Trade> {
        self.trade.validate()?;
        Ok(self.trade)
    }
}
