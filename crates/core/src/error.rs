//! Settlement engine error types.
//!
//! Every error is local to a single computation. Caller-data errors are
//! recoverable by correcting the input; `BalanceInvariant` and `AmountOverflow`
//! are internal failures and fatal for the request. Nothing is ever retried:
//! identical input yields the identical error.

use divvy_shared::AppError;
use divvy_shared::types::{ExpenseId, MemberId, SettlementId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::expense::ExactAmount;

/// Errors that can occur while validating, rounding, aggregating or settling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    // ========== Expense Validation Errors ==========
    /// Expense amount must be positive.
    #[error("Expense {expense_id} amount must be positive, got {amount}")]
    InvalidAmount {
        /// The expense.
        expense_id: ExpenseId,
        /// The rejected amount in minor units.
        amount: i64,
    },

    /// Expense has no shares.
    #[error("Expense {expense_id} has no shares")]
    EmptyShares {
        /// The expense.
        expense_id: ExpenseId,
    },

    /// A share amount is negative.
    #[error("Expense {expense_id} has negative share {amount} for member {member_id}")]
    NegativeShare {
        /// The expense.
        expense_id: ExpenseId,
        /// The member holding the share.
        member_id: MemberId,
        /// The rejected share amount.
        amount: ExactAmount,
    },

    /// A member appears more than once in an expense.
    #[error("Member {member_id} appears more than once in expense {expense_id}")]
    DuplicateShare {
        /// The expense.
        expense_id: ExpenseId,
        /// The repeated member.
        member_id: MemberId,
    },

    /// Shares do not add up to the expense amount.
    #[error("Shares of expense {expense_id} sum to {actual}, expected {expected}")]
    ShareMismatch {
        /// The expense.
        expense_id: ExpenseId,
        /// The expense amount in minor units.
        expected: i64,
        /// The exact sum of the recorded shares.
        actual: ExactAmount,
    },

    /// A split weight is zero, negative or not representable.
    #[error(
        "Weight {weight} for member {member_id} in expense {expense_id} must be positive and not finer than the other weights allow"
    )]
    InvalidWeight {
        /// The expense.
        expense_id: ExpenseId,
        /// The member the weight belongs to.
        member_id: MemberId,
        /// The rejected weight.
        weight: Decimal,
    },

    // ========== Rounding Errors ==========
    /// Raw shares handed to the rounder do not add up to the total.
    #[error("Raw shares sum to {actual}, expected {expected}")]
    AllocationMismatch {
        /// The total in minor units.
        expected: i64,
        /// The exact sum of the raw shares.
        actual: ExactAmount,
    },

    /// Rounding policy `none` was given a fractional share.
    #[error("Share {amount} for member {member_id} is not a whole number of minor units")]
    Unroundable {
        /// The member holding the share.
        member_id: MemberId,
        /// The fractional share amount.
        amount: ExactAmount,
    },

    // ========== Settlement Errors ==========
    /// A manual settlement is malformed.
    #[error("Settlement {settlement_id} is invalid: {reason}")]
    InvalidSettlement {
        /// The settlement.
        settlement_id: SettlementId,
        /// What is wrong with it.
        reason: &'static str,
    },

    // ========== Internal Errors ==========
    /// Net balances do not sum to zero.
    #[error("Balance invariant violated: balances sum to {sum}, expected 0")]
    BalanceInvariant {
        /// The non-zero sum in minor units.
        sum: i128,
    },

    /// An intermediate amount left the representable range.
    #[error("Amount overflow while computing balances")]
    AmountOverflow,
}

impl SettlementError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::EmptyShares { .. } => "EMPTY_SHARES",
            Self::NegativeShare { .. } => "NEGATIVE_SHARE",
            Self::DuplicateShare { .. } => "DUPLICATE_SHARE",
            Self::ShareMismatch { .. } => "SHARE_MISMATCH",
            Self::InvalidWeight { .. } => "INVALID_WEIGHT",
            Self::AllocationMismatch { .. } => "ALLOCATION_MISMATCH",
            Self::Unroundable { .. } => "UNROUNDABLE_AMOUNT",
            Self::InvalidSettlement { .. } => "INVALID_SETTLEMENT",
            Self::BalanceInvariant { .. } => "BALANCE_INVARIANT",
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
        }
    }

    /// Returns true for internal failures that indicate a defect rather than bad input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::BalanceInvariant { .. } | Self::AmountOverflow)
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        if self.is_internal() { 500 } else { 400 }
    }
}

impl From<SettlementError> for AppError {
    fn from(err: SettlementError) -> Self {
        if err.is_internal() {
            Self::Internal(err.to_string())
        } else {
            Self::Validation(err.to_string())
        }
    }
}
