//! Exact rational amounts of minor currency units.
//!
//! A 3-way split of 100 cents is `100/3` cents. Carrying that value exactly,
//! instead of as `33.33`, lets share validation check sums without tolerance
//! and lets the rounding policy see the true fractional remainder of every share.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// An exact rational number of minor units.
///
/// Always stored in lowest terms with a positive denominator, so derived
/// equality is value equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ExactAmountRepr", into = "ExactAmountRepr")]
pub struct ExactAmount {
    numer: i128,
    denom: u64,
}

#[derive(Serialize, Deserialize)]
struct ExactAmountRepr {
    numer: i128,
    denom: u64,
}

impl TryFrom<ExactAmountRepr> for ExactAmount {
    type Error = &'static str;

    fn try_from(repr: ExactAmountRepr) -> Result<Self, Self::Error> {
        Self::new(repr.numer, repr.denom).ok_or("denominator must be positive")
    }
}

impl From<ExactAmount> for ExactAmountRepr {
    fn from(amount: ExactAmount) -> Self {
        Self {
            numer: amount.numer,
            denom: amount.denom,
        }
    }
}

pub(crate) fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl ExactAmount {
    /// Zero minor units.
    pub const ZERO: Self = Self { numer: 0, denom: 1 };

    /// Creates `numer / denom` in lowest terms. Returns `None` if `denom` is zero.
    #[must_use]
    pub fn new(numer: i128, denom: u64) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        let divisor = u64::try_from(gcd(numer.unsigned_abs(), u128::from(denom))).ok()?;
        Some(Self {
            numer: numer / i128::from(divisor),
            denom: denom / divisor,
        })
    }

    /// A whole number of minor units.
    #[must_use]
    pub fn from_minor(minor: i64) -> Self {
        Self {
            numer: i128::from(minor),
            denom: 1,
        }
    }

    /// Converts a decimal number of minor units exactly.
    ///
    /// Returns `None` if the decimal has more than 19 fractional digits.
    #[must_use]
    pub fn from_decimal(value: Decimal) -> Option<Self> {
        let denom = 10_u64.checked_pow(value.scale())?;
        Self::new(value.mantissa(), denom)
    }

    /// Numerator in lowest terms.
    #[must_use]
    pub const fn numer(self) -> i128 {
        self.numer
    }

    /// Denominator in lowest terms, always positive.
    #[must_use]
    pub const fn denom(self) -> u64 {
        self.denom
    }

    /// Returns true if this is a whole number of minor units.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        self.denom == 1
    }

    /// Returns true if the amount is below zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.numer < 0
    }

    /// Rounds toward zero.
    #[must_use]
    pub fn trunc(self) -> i128 {
        self.numer / i128::from(self.denom)
    }

    /// Rounds away from zero.
    #[must_use]
    pub fn round_away(self) -> i128 {
        if self.is_integer() {
            self.numer
        } else {
            self.trunc() + self.numer.signum()
        }
    }

    /// Distance to the next whole unit toward zero, in `[0, 1)`.
    #[must_use]
    pub fn fract_magnitude(self) -> Self {
        Self {
            numer: (self.numer % i128::from(self.denom)).abs(),
            denom: self.denom,
        }
    }

    /// Exact addition. Returns `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        let divisor = u64::try_from(gcd(u128::from(self.denom), u128::from(other.denom))).ok()?;
        let lhs_scale = other.denom / divisor;
        let rhs_scale = self.denom / divisor;
        let denom = self.denom.checked_mul(lhs_scale)?;
        let numer = self
            .numer
            .checked_mul(i128::from(lhs_scale))?
            .checked_add(other.numer.checked_mul(i128::from(rhs_scale))?)?;
        Self::new(numer, denom)
    }

    /// Exact subtraction. Returns `None` on overflow.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.checked_add(Self {
            numer: other.numer.checked_neg()?,
            denom: other.denom,
        })
    }

    /// Exact sum of a sequence. Returns `None` on overflow.
    pub fn checked_sum<I>(amounts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

impl From<i64> for ExactAmount {
    fn from(minor: i64) -> Self {
        Self::from_minor(minor)
    }
}

impl Ord for ExactAmount {
    fn cmp(&self, other: &Self) -> Ordering {
        // Whole parts first, then fractional parts cross-multiplied. Both
        // remainders are below their u64 denominators, so the products fit u128.
        let lhs_floor = self.numer.div_euclid(i128::from(self.denom));
        let rhs_floor = other.numer.div_euclid(i128::from(other.denom));
        lhs_floor.cmp(&rhs_floor).then_with(|| {
            let lhs_rem = self.numer.rem_euclid(i128::from(self.denom)).unsigned_abs();
            let rhs_rem = other.numer.rem_euclid(i128::from(other.denom)).unsigned_abs();
            (lhs_rem * u128::from(other.denom)).cmp(&(rhs_rem * u128::from(self.denom)))
        })
    }
}

impl PartialOrd for ExactAmount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for ExactAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}
