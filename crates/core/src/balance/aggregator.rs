//! Net balance aggregation.
//!
//! Balances are always recomputed from the full history:
//! - the payer of an expense is credited the full amount
//! - every member is debited their rounded share
//! - a manual settlement moves `amount` from the payee back to the payer
//!
//! Net balance = total paid - total share + settlements paid - settlements received.
//! Positive means the group owes the member; negative means the member owes the group.

use std::collections::BTreeMap;

use divvy_shared::types::{MemberId, RoundingPolicy};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::SettlementError;
use crate::expense::{Expense, ManualSettlement, ShareValidator};
use crate::rounding::ShareRounder;

/// Net balance per member in minor units, ordered by member id.
pub type BalanceMap = BTreeMap<MemberId, i64>;

/// Per-member breakdown behind a net balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtSummary {
    /// The member.
    pub member_id: MemberId,
    /// Sum of expense amounts this member paid.
    pub total_paid: i64,
    /// Sum of this member's rounded shares.
    pub total_share: i64,
    /// Sum of manual settlements this member paid to others.
    pub settlements_paid: i64,
    /// Sum of manual settlements this member received.
    pub settlements_received: i64,
    /// Net balance (positive = owed to this member).
    pub net_balance: i64,
}

impl DebtSummary {
    fn new(member_id: MemberId) -> Self {
        Self {
            member_id,
            total_paid: 0,
            total_share: 0,
            settlements_paid: 0,
            settlements_received: 0,
            net_balance: 0,
        }
    }
}

fn add(target: &mut i64, amount: i64) -> Result<(), SettlementError> {
    *target = target
        .checked_add(amount)
        .ok_or(SettlementError::AmountOverflow)?;
    Ok(())
}

fn sub(target: &mut i64, amount: i64) -> Result<(), SettlementError> {
    *target = target
        .checked_sub(amount)
        .ok_or(SettlementError::AmountOverflow)?;
    Ok(())
}

/// Folds expenses and manual settlements into per-member balances.
pub struct BalanceAggregator;

impl BalanceAggregator {
    /// Computes every touched member's net balance.
    ///
    /// Each expense is validated, its shares resolved under `policy`, then folded in.
    /// The result has an entry for every member referenced by any expense or
    /// settlement, zero balances included, and always sums to zero.
    ///
    /// # Errors
    ///
    /// Returns validation and rounding errors for malformed input, and
    /// `BalanceInvariant` or `AmountOverflow` on internal failure.
    pub fn aggregate(
        expenses: &[Expense],
        settlements: &[ManualSettlement],
        policy: RoundingPolicy,
    ) -> Result<BalanceMap, SettlementError> {
        Ok(Self::summarize(expenses, settlements, policy)?
            .into_iter()
            .map(|summary| (summary.member_id, summary.net_balance))
            .collect())
    }

    /// Computes the per-member debt summary, sorted by member id.
    ///
    /// # Errors
    ///
    /// Same as [`BalanceAggregator::aggregate`].
    pub fn summarize(
        expenses: &[Expense],
        settlements: &[ManualSettlement],
        policy: RoundingPolicy,
    ) -> Result<Vec<DebtSummary>, SettlementError> {
        let mut members: BTreeMap<MemberId, DebtSummary> = BTreeMap::new();

        for expense in expenses {
            let shares = Self::rounded_shares(expense, policy)?;

            let payer = members
                .entry(expense.paid_by)
                .or_insert_with(|| DebtSummary::new(expense.paid_by));
            add(&mut payer.total_paid, expense.amount)?;
            add(&mut payer.net_balance, expense.amount)?;

            for (member_id, share) in shares {
                let entry = members
                    .entry(member_id)
                    .or_insert_with(|| DebtSummary::new(member_id));
                add(&mut entry.total_share, share)?;
                sub(&mut entry.net_balance, share)?;
            }
        }

        for settlement in settlements {
            ShareValidator::validate_settlement(settlement)?;

            let from = members
                .entry(settlement.from_member)
                .or_insert_with(|| DebtSummary::new(settlement.from_member));
            add(&mut from.settlements_paid, settlement.amount)?;
            add(&mut from.net_balance, settlement.amount)?;

            let to = members
                .entry(settlement.to_member)
                .or_insert_with(|| DebtSummary::new(settlement.to_member));
            add(&mut to.settlements_received, settlement.amount)?;
            sub(&mut to.net_balance, settlement.amount)?;
        }

        let summary: Vec<DebtSummary> = members.into_values().collect();
        Self::check_zero_sum(summary.iter().map(|s| s.net_balance))?;

        debug!(
            expenses = expenses.len(),
            settlements = settlements.len(),
            members = summary.len(),
            "aggregated balances"
        );

        Ok(summary)
    }

    /// Validates an expense and resolves its shares to whole minor units.
    fn rounded_shares(
        expense: &Expense,
        policy: RoundingPolicy,
    ) -> Result<Vec<(MemberId, i64)>, SettlementError> {
        ShareValidator::validate(expense)?;

        let raw: Vec<_> = expense
            .shares
            .iter()
            .map(|share| (share.member_id, share.share_amount))
            .collect();

        ShareRounder::apply(&raw, expense.amount, policy)
    }

    /// Checks that balances sum to exactly zero.
    ///
    /// A violation means upstream data or rounding reconciliation is defective.
    /// It is logged at error level and never corrected.
    ///
    /// # Errors
    ///
    /// Returns `BalanceInvariant` carrying the non-zero sum.
    pub fn check_zero_sum<I>(balances: I) -> Result<(), SettlementError>
    where
        I: IntoIterator<Item = i64>,
    {
        let sum: i128 = balances.into_iter().map(i128::from).sum();
        if sum != 0 {
            error!(sum, "net balances do not sum to zero");
            return Err(SettlementError::BalanceInvariant { sum });
        }
        Ok(())
    }
}
