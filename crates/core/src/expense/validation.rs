//! Consistency checks for expenses and manual settlements.

use std::collections::BTreeSet;

use crate::error::SettlementError;

use super::amount::ExactAmount;
use super::types::{Expense, ManualSettlement};

/// Validates caller-supplied records before they enter aggregation.
///
/// Runs before any rounding reconciliation, so share amounts are checked exactly
/// as recorded: a 3-way split of 100 must carry shares of `100/3`, not `33`.
pub struct ShareValidator;

impl ShareValidator {
    /// Validates one expense.
    ///
    /// Checks, in order: the amount is positive, shares are non-empty, no share
    /// is negative, no member appears twice, and shares sum to the amount exactly.
    ///
    /// # Errors
    ///
    /// Returns the first rule the expense violates.
    pub fn validate(expense: &Expense) -> Result<(), SettlementError> {
        if expense.amount <= 0 {
            return Err(SettlementError::InvalidAmount {
                expense_id: expense.id,
                amount: expense.amount,
            });
        }

        if expense.shares.is_empty() {
            return Err(SettlementError::EmptyShares {
                expense_id: expense.id,
            });
        }

        let mut seen = BTreeSet::new();
        let mut total = ExactAmount::ZERO;

        for share in &expense.shares {
            if share.share_amount.is_negative() {
                return Err(SettlementError::NegativeShare {
                    expense_id: expense.id,
                    member_id: share.member_id,
                    amount: share.share_amount,
                });
            }

            if !seen.insert(share.member_id) {
                return Err(SettlementError::DuplicateShare {
                    expense_id: expense.id,
                    member_id: share.member_id,
                });
            }

            total = total
                .checked_add(share.share_amount)
                .ok_or(SettlementError::AmountOverflow)?;
        }

        if total != ExactAmount::from_minor(expense.amount) {
            return Err(SettlementError::ShareMismatch {
                expense_id: expense.id,
                expected: expense.amount,
                actual: total,
            });
        }

        Ok(())
    }

    /// Validates one manual settlement: positive amount between two different members.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSettlement` describing the violated rule.
    pub fn validate_settlement(settlement: &ManualSettlement) -> Result<(), SettlementError> {
        if settlement.amount <= 0 {
            return Err(SettlementError::InvalidSettlement {
                settlement_id: settlement.id,
                reason: "amount must be positive",
            });
        }

        if settlement.from_member == settlement.to_member {
            return Err(SettlementError::InvalidSettlement {
                settlement_id: settlement.id,
                reason: "payer and payee must differ",
            });
        }

        Ok(())
    }
}
