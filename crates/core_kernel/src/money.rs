//! Money types with precise decimal arithmetic
//!
//! Every price in the system (rental orders, driver logs, invoices) is a
//! `Money` value backed by `rust_decimal`, so tier formulas such as
//! `weekly * (days / 7)` never accumulate floating-point error.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    USD,
    CAD,
    MXN,
    EUR,
    GBP,
    AUD,
}

impl Currency {
    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::CAD => "C$",
            Currency::MXN => "MX$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::AUD => "A$",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::CAD => "CAD",
            Currency::MXN => "MXN",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::AUD => "AUD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "CAD" => Ok(Currency::CAD),
            "MXN" => Ok(Currency::MXN),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "AUD" => Ok(Currency::AUD),
            other => Err(MoneyError::UnknownCurrency(other.to_string())),
        }
    }
}

/// Largest amount a stored price, rate or quantity may hold
///
/// Matches the `NUMERIC(19, 4)` columns amounts are persisted in.
pub const MAX_AMOUNT: Decimal = dec!(999_999_999_999_999.9999);

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Amount {0} is out of range")]
    OutOfRange(Decimal),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
}

/// A monetary amount with associated currency
///
/// Amounts are kept with 4 decimal places internally; prices are rounded to
/// the currency's minor unit only when they are finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(4),
            currency,
        }
    }

    /// Creates a finalized price, rounding a raw amount straight to the
    /// currency's minor unit (half away from zero)
    pub fn rounded(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp_with_strategy(
                currency.decimal_places(),
                RoundingStrategy::MidpointAwayFromZero,
            ),
            currency,
        }
    }

    /// Creates Money from an integer amount in minor units (e.g., cents)
    pub fn from_minor(minor_units: i64, currency: Currency) -> Self {
        Self::new(
            Decimal::new(minor_units, currency.decimal_places()),
            currency,
        )
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: dec!(0),
            currency,
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Returns true if the amount is strictly negative
    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Fails when the amount does not fit a stored price
    pub fn ensure_storable(&self) -> Result<(), MoneyError> {
        if self.amount.abs() > MAX_AMOUNT {
            return Err(MoneyError::OutOfRange(self.amount));
        }
        Ok(())
    }

    /// The smaller of this price and `ceiling`
    ///
    /// The ceiling is rounded like a finalized price, so capping a rounded
    /// price gives the same result as rounding a capped raw amount.
    pub fn capped_at(&self, ceiling: Decimal) -> Money {
        let ceiling = Self::rounded(ceiling, self.currency);
        if ceiling.amount < self.amount {
            ceiling
        } else {
            *self
        }
    }

    /// Clamps negative amounts, including a rounded `-0.00`, to zero
    pub fn non_negative(&self) -> Self {
        if self.amount.is_sign_negative() {
            Self::zero(self.currency)
        } else {
            *self
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.decimal_places();
        write!(
            f,
            "{}{:.dp$}",
            self.currency.symbol(),
            self.amount,
            dp = dp as usize
        )
    }
}

/// A price multiplier such as the driver surcharge (`1.2`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Multiplier(Decimal);

impl Multiplier {
    /// Leaves prices untouched
    pub const IDENTITY: Multiplier = Multiplier(Decimal::ONE);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Scales a raw amount, or `None` if the result overflows
    pub fn checked_apply(&self, amount: Decimal) -> Option<Decimal> {
        amount.checked_mul(self.0)
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0.normalize())
    }
}
