//! Currency handling at the system boundary.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Stored amounts are `rust_decimal::Decimal`; the settlement engine works in
//! integer minor units (e.g., cents). Conversion happens exactly once, here.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    #[default]
    Usd,
    /// Indonesian Rupiah
    Idr,
    /// Euro
    Eur,
    /// Singapore Dollar
    Sgd,
    /// Japanese Yen
    Jpy,
}

impl Currency {
    /// Number of decimal places in one major unit (ISO 4217 exponent).
    #[must_use]
    pub const fn minor_unit_exponent(self) -> u32 {
        match self {
            Self::Jpy => 0,
            Self::Usd | Self::Idr | Self::Eur | Self::Sgd => 2,
        }
    }
}

/// Errors converting between decimal amounts and minor units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The amount has more decimal places than the currency allows.
    #[error("Amount {amount} has more precision than {currency} allows")]
    TooPrecise {
        /// The rejected amount.
        amount: Decimal,
        /// The currency it was expressed in.
        currency: Currency,
    },

    /// The amount does not fit in a 64-bit count of minor units.
    #[error("Amount {0} is out of range")]
    OutOfRange(Decimal),
}

/// Converts a decimal amount into integer minor units.
///
/// The conversion is exact: `10.50 USD` becomes `1050`, while `10.505 USD` is rejected
/// rather than rounded.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use divvy_shared::types::{Currency, to_minor_units};
///
/// assert_eq!(to_minor_units(dec!(90.00), Currency::Usd), Ok(9000));
/// ```
pub fn to_minor_units(amount: Decimal, currency: Currency) -> Result<i64, MoneyError> {
    let factor = Decimal::from(10_i64.pow(currency.minor_unit_exponent()));
    let scaled = amount
        .checked_mul(factor)
        .ok_or(MoneyError::OutOfRange(amount))?;

    if !scaled.fract().is_zero() {
        return Err(MoneyError::TooPrecise { amount, currency });
    }

    scaled.to_i64().ok_or(MoneyError::OutOfRange(amount))
}

/// Converts integer minor units back into a decimal amount.
#[must_use]
pub fn from_minor_units(minor: i64, currency: Currency) -> Decimal {
    Decimal::new(minor, currency.minor_unit_exponent())
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usd => write!(f, "USD"),
            Self::Idr => write!(f, "IDR"),
            Self::Eur => write!(f, "EUR"),
            Self::Sgd => write!(f, "SGD"),
            Self::Jpy => write!(f, "JPY"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "IDR" => Ok(Self::Idr),
            "EUR" => Ok(Self::Eur),
            "SGD" => Ok(Self::Sgd),
            "JPY" => Ok(Self::Jpy),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
