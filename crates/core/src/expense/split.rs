//! Split builders: turn "split this evenly" or "split by these weights" into
//! exact per-member shares.

use divvy_shared::types::{ExpenseId, MemberId, RoundingPolicy};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SettlementError;
use crate::rounding::ShareRounder;

use super::amount::{ExactAmount, gcd};
use super::types::{Expense, ExpenseShare};
use super::validation::ShareValidator;

/// How an expense amount is divided among members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "members", rename_all = "snake_case")]
pub enum Split {
    /// Every member owes `amount / n`.
    Equal(Vec<MemberId>),
    /// Every member owes `amount * weight / total_weight`.
    Weighted(Vec<(MemberId, Decimal)>),
    /// Shares given directly in minor units.
    Exact(Vec<(MemberId, i64)>),
}

impl Split {
    /// Computes exact (possibly fractional) shares of `amount`.
    ///
    /// Shares are returned in the order members were listed. Duplicate members are
    /// not rejected here; [`ShareValidator`] does that when the expense is built.
    ///
    /// # Errors
    ///
    /// Returns `EmptyShares` for an empty member list, `InvalidWeight` for a
    /// non-positive weight or a weight set too precise to share one
    /// denominator, or `AmountOverflow`.
    pub fn raw_shares(
        &self,
        expense_id: ExpenseId,
        amount: i64,
    ) -> Result<Vec<ExpenseShare>, SettlementError> {
        match self {
            Self::Equal(members) => {
                if members.is_empty() {
                    return Err(SettlementError::EmptyShares { expense_id });
                }
                let count = u64::try_from(members.len()).map_err(|_| SettlementError::AmountOverflow)?;
                let share = ExactAmount::new(i128::from(amount), count)
                    .ok_or(SettlementError::AmountOverflow)?;
                Ok(members
                    .iter()
                    .map(|member_id| ExpenseShare::new(*member_id, share))
                    .collect())
            }
            Self::Weighted(weights) => Self::weighted_shares(expense_id, amount, weights),
            Self::Exact(amounts) => Ok(amounts
                .iter()
                .map(|(member_id, share)| ExpenseShare::new(*member_id, *share))
                .collect()),
        }
    }

    fn weighted_shares(
        expense_id: ExpenseId,
        amount: i64,
        weights: &[(MemberId, Decimal)],
    ) -> Result<Vec<ExpenseShare>, SettlementError> {
        if weights.is_empty() {
            return Err(SettlementError::EmptyShares { expense_id });
        }

        if let Some((member_id, weight)) = weights.iter().find(|(_, w)| *w <= Decimal::ZERO) {
            return Err(SettlementError::InvalidWeight {
                expense_id,
                member_id: *member_id,
                weight: *weight,
            });
        }

        // Bring every weight to a common scale so they become integer parts,
        // then divide out their common factor: equal weights of any precision
        // reduce to equal small parts.
        let scale = weights.iter().map(|(_, w)| w.scale()).max().unwrap_or(0);
        let mut parts = Vec::with_capacity(weights.len());
        for (member_id, weight) in weights {
            let part = 10_u128
                .checked_pow(scale - weight.scale())
                .and_then(|factor| weight.mantissa().unsigned_abs().checked_mul(factor))
                .ok_or(SettlementError::InvalidWeight {
                    expense_id,
                    member_id: *member_id,
                    weight: *weight,
                })?;
            parts.push((*member_id, part));
        }

        let divisor = parts.iter().fold(0, |acc, (_, part)| gcd(acc, *part));
        let total_parts = parts
            .iter()
            .try_fold(0_u128, |acc, (_, part)| acc.checked_add(part / divisor))
            .and_then(|total| u64::try_from(total).ok());

        // Weights too fine-grained to share a u64 denominator: blame the most precise one.
        let Some(total_parts) = total_parts else {
            let (member_id, weight) = weights
                .iter()
                .fold(&weights[0], |finest, w| if w.1.scale() > finest.1.scale() { w } else { finest });
            return Err(SettlementError::InvalidWeight {
                expense_id,
                member_id: *member_id,
                weight: *weight,
            });
        };

        parts
            .into_iter()
            .map(|(member_id, part)| {
                i128::try_from(part / divisor)
                    .ok()
                    .and_then(|part| i128::from(amount).checked_mul(part))
                    .and_then(|numer| ExactAmount::new(numer, total_parts))
                    .map(|share| ExpenseShare::new(member_id, share))
                    .ok_or(SettlementError::AmountOverflow)
            })
            .collect()
    }

    /// Builds a validated expense carrying the exact shares.
    ///
    /// # Errors
    ///
    /// Returns any split or [`ShareValidator`] error.
    pub fn build_expense(
        &self,
        id: ExpenseId,
        amount: i64,
        paid_by: MemberId,
    ) -> Result<Expense, SettlementError> {
        let expense = Expense {
            id,
            amount,
            paid_by,
            shares: self.raw_shares(id, amount)?,
        };
        ShareValidator::validate(&expense)?;
        Ok(expense)
    }

    /// Builds a validated expense whose shares are already resolved to whole
    /// minor units under `policy`, ready to be stored.
    ///
    /// # Errors
    ///
    /// Returns any split, validation or rounding error (e.g. `Unroundable` for
    /// policy `none` with an uneven split).
    pub fn resolve_expense(
        &self,
        id: ExpenseId,
        amount: i64,
        paid_by: MemberId,
        policy: RoundingPolicy,
    ) -> Result<Expense, SettlementError> {
        let mut expense = self.build_expense(id, amount, paid_by)?;
        let raw: Vec<_> = expense
            .shares
            .iter()
            .map(|share| (share.member_id, share.share_amount))
            .collect();
        let rounded = ShareRounder::apply(&raw, amount, policy)?;

        for (share, (_, minor)) in expense.shares.iter_mut().zip(rounded) {
            share.share_amount = ExactAmount::from_minor(minor);
        }
        Ok(expense)
    }
}
