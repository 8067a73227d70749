//! Expense and settlement records supplied by the persistence layer.

use divvy_shared::types::{ExpenseId, MemberId, SettlementId};
use serde::{Deserialize, Serialize};

use super::amount::ExactAmount;

/// One member's share of an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseShare {
    /// The member who owes this share.
    pub member_id: MemberId,
    /// Share in minor units, exact until the group's rounding policy resolves it.
    pub share_amount: ExactAmount,
    /// Whether the member marked this share as paid.
    ///
    /// Informational only: balances are recomputed from the full history and
    /// manual settlements, so this flag never changes a balance.
    #[serde(default)]
    pub settled: bool,
}

impl ExpenseShare {
    /// Creates an unsettled share.
    #[must_use]
    pub fn new(member_id: MemberId, share_amount: impl Into<ExactAmount>) -> Self {
        Self {
            member_id,
            share_amount: share_amount.into(),
            settled: false,
        }
    }
}

/// An expense paid by one member and shared by one or more members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// The expense ID.
    pub id: ExpenseId,
    /// Total amount in minor units.
    pub amount: i64,
    /// The member who paid.
    pub paid_by: MemberId,
    /// Who owes what; one entry per distinct member.
    pub shares: Vec<ExpenseShare>,
}

/// A payment between two members made outside the expense-sharing flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualSettlement {
    /// The settlement ID.
    pub id: SettlementId,
    /// The member who paid.
    pub from_member: MemberId,
    /// The member who received the payment.
    pub to_member: MemberId,
    /// Amount in minor units, positive.
    pub amount: i64,
}

impl ManualSettlement {
    /// Creates a settlement record under an ID assigned by the caller.
    #[must_use]
    pub fn new(id: SettlementId, from_member: MemberId, to_member: MemberId, amount: i64) -> Self {
        Self {
            id,
            from_member,
            to_member,
            amount,
        }
    }
}
