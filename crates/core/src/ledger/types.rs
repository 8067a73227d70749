//! Group-level inputs and outputs of the settlement pipeline.

use divvy_shared::types::{GroupId, RoundingPolicy};
use serde::{Deserialize, Serialize};

use crate::balance::{BalanceMap, DebtSummary};
use crate::error::SettlementError;
use crate::expense::{Expense, ManualSettlement};
use crate::settlement::Transfer;

/// Closed snapshot of one group's history, as loaded by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLedger {
    /// The group ID.
    pub group_id: GroupId,
    /// The group's rounding option.
    #[serde(default)]
    pub rounding: RoundingPolicy,
    /// Every expense recorded in the group.
    #[serde(default)]
    pub expenses: Vec<Expense>,
    /// Every manual settlement recorded in the group.
    #[serde(default)]
    pub settlements: Vec<ManualSettlement>,
}

impl GroupLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new(group_id: GroupId, rounding: RoundingPolicy) -> Self {
        Self {
            group_id,
            rounding,
            expenses: Vec::new(),
            settlements: Vec::new(),
        }
    }
}

/// Result of settling one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSettlement {
    /// The group ID.
    pub group_id: GroupId,
    /// Rounding policy the balances were computed under.
    pub rounding: RoundingPolicy,
    /// Net balance per member.
    pub balances: BalanceMap,
    /// Per-member breakdown, sorted by member id.
    pub summary: Vec<DebtSummary>,
    /// Suggested transfers, in order. Advisory only.
    pub transfers: Vec<Transfer>,
}

impl GroupSettlement {
    /// Returns true when nobody owes anything.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }
}

/// Per-group result of a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOutcome {
    /// The group this outcome belongs to.
    pub group_id: GroupId,
    /// The settlement, or the error that stopped this group.
    pub result: Result<GroupSettlement, SettlementError>,
}
