//! Ledger service running the full settlement pipeline.
//!
//! This service contains pure business logic with no database dependencies.
//! The caller loads a group's expenses and settlements, hands them over as a
//! [`GroupLedger`], and persists whichever transfers the members act on.

use rayon::prelude::*;
use tracing::{error, info, info_span, warn};

use super::types::{GroupLedger, GroupOutcome, GroupSettlement};
use crate::balance::{BalanceAggregator, BalanceMap};
use crate::error::SettlementError;
use crate::settlement::SettlementOptimizer;

/// Ledger service for settling groups.
pub struct LedgerService;

impl LedgerService {
    /// Settles one group.
    ///
    /// 1. Validates every expense and manual settlement
    /// 2. Resolves shares under the group's rounding policy
    /// 3. Aggregates net balances and the per-member summary
    /// 4. Computes the transfer list
    ///
    /// # Errors
    ///
    /// Returns the first `SettlementError` hit; nothing is partially computed.
    pub fn settle(ledger: &GroupLedger) -> Result<GroupSettlement, SettlementError> {
        let span = info_span!(
            "settle_group",
            group_id = %ledger.group_id,
            rounding = %ledger.rounding,
        );
        let _guard = span.enter();

        Self::run(ledger).inspect_err(|err| {
            if err.is_internal() {
                error!(code = err.error_code(), error = %err, "group settlement failed");
            } else {
                warn!(code = err.error_code(), error = %err, "group rejected");
            }
        })
    }

    fn run(ledger: &GroupLedger) -> Result<GroupSettlement, SettlementError> {
        let summary =
            BalanceAggregator::summarize(&ledger.expenses, &ledger.settlements, ledger.rounding)?;
        let balances: BalanceMap = summary
            .iter()
            .map(|row| (row.member_id, row.net_balance))
            .collect();
        let transfers = SettlementOptimizer::optimize(&balances)?;

        info!(
            expenses = ledger.expenses.len(),
            settlements = ledger.settlements.len(),
            members = balances.len(),
            transfers = transfers.len(),
            "group settled"
        );

        Ok(GroupSettlement {
            group_id: ledger.group_id,
            rounding: ledger.rounding,
            balances,
            summary,
            transfers,
        })
    }

    /// Settles many independent groups in parallel.
    ///
    /// Outcomes come back in input order. A failing group never affects the others.
    #[must_use]
    pub fn settle_all(ledgers: &[GroupLedger]) -> Vec<GroupOutcome> {
        let outcomes: Vec<GroupOutcome> = ledgers
            .par_iter()
            .map(|ledger| GroupOutcome {
                group_id: ledger.group_id,
                result: Self::settle(ledger),
            })
            .collect();

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        info!(groups = outcomes.len(), failed, "batch settlement finished");

        outcomes
    }
}
