//! Greedy transfer minimization.
//!
//! Creditors and debtors are kept in two max-heaps keyed by the magnitude of
//! their balance. Each step matches the largest creditor with the largest
//! debtor, moves `min(credit, debt)` between them and pushes back whichever
//! side still has a balance. Every step retires at least one party and the
//! final step retires two, so `n` non-zero balances settle in at most `n - 1`
//! transfers.
//!
//! Ties on magnitude go to the lowest member id, which makes the output a pure
//! function of the balance map.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use divvy_shared::types::MemberId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::balance::{BalanceAggregator, BalanceMap};
use crate::error::SettlementError;

/// A suggested payment from a debtor to a creditor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// The member who pays.
    pub from_member: MemberId,
    /// The member who receives.
    pub to_member: MemberId,
    /// Amount in minor units, always positive.
    pub amount: i64,
}

/// One iteration of the matching loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStep {
    /// The debtor matched in this step.
    pub debtor: MemberId,
    /// The creditor matched in this step.
    pub creditor: MemberId,
    /// Debtor's outstanding debt before the step (positive).
    pub debtor_balance: i64,
    /// Creditor's outstanding credit before the step.
    pub creditor_balance: i64,
    /// Amount moved.
    pub amount: i64,
}

/// Transfers plus the step trace that produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPlan {
    /// Transfers in the order they were matched.
    pub transfers: Vec<Transfer>,
    /// One entry per matching step, aligned with `transfers`.
    pub steps: Vec<MatchStep>,
}

/// Heap entry. Field order drives the derived ordering: larger amount first,
/// then lower member id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Party {
    amount: i64,
    member_id: Reverse<MemberId>,
}

impl Party {
    fn new(member_id: MemberId, amount: i64) -> Self {
        Self {
            amount,
            member_id: Reverse(member_id),
        }
    }

    fn member(&self) -> MemberId {
        self.member_id.0
    }
}

/// Turns a balance map into a short list of transfers that zeroes it.
pub struct SettlementOptimizer;

impl SettlementOptimizer {
    /// Computes the transfer list for `balances`.
    ///
    /// # Example
    ///
    /// ```
    /// use divvy_core::{BalanceMap, SettlementOptimizer};
    /// use divvy_shared::types::MemberId;
    ///
    /// let (a, b, c) = (MemberId::new(), MemberId::new(), MemberId::new());
    /// let balances = BalanceMap::from([(a, 6000), (b, -3000), (c, -3000)]);
    /// let transfers = SettlementOptimizer::optimize(&balances).unwrap();
    /// assert_eq!(transfers.len(), 2);
    /// assert!(transfers.iter().all(|t| t.to_member == a && t.amount == 3000));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `BalanceInvariant` if the balances do not sum to zero, or
    /// `AmountOverflow` for a balance of `i64::MIN`.
    pub fn optimize(balances: &BalanceMap) -> Result<Vec<Transfer>, SettlementError> {
        Ok(Self::plan(balances)?.transfers)
    }

    /// Computes the transfer list together with the per-step trace.
    ///
    /// # Errors
    ///
    /// Same as [`SettlementOptimizer::optimize`].
    pub fn plan(balances: &BalanceMap) -> Result<SettlementPlan, SettlementError> {
        BalanceAggregator::check_zero_sum(balances.values().copied())?;

        let mut creditors = BinaryHeap::new();
        let mut debtors = BinaryHeap::new();

        for (member_id, balance) in balances {
            match balance.signum() {
                1 => creditors.push(Party::new(*member_id, *balance)),
                -1 => {
                    let debt = balance
                        .checked_neg()
                        .ok_or(SettlementError::AmountOverflow)?;
                    debtors.push(Party::new(*member_id, debt));
                }
                _ => {}
            }
        }

        let parties = creditors.len() + debtors.len();
        let mut plan = SettlementPlan::default();

        while let (Some(creditor), Some(debtor)) = (creditors.pop(), debtors.pop()) {
            let amount = creditor.amount.min(debtor.amount);

            debug!(
                step = plan.steps.len() + 1,
                debtor = %debtor.member(),
                creditor = %creditor.member(),
                debtor_balance = debtor.amount,
                creditor_balance = creditor.amount,
                amount,
                "matched debtor with creditor"
            );

            plan.steps.push(MatchStep {
                debtor: debtor.member(),
                creditor: creditor.member(),
                debtor_balance: debtor.amount,
                creditor_balance: creditor.amount,
                amount,
            });
            plan.transfers.push(Transfer {
                from_member: debtor.member(),
                to_member: creditor.member(),
                amount,
            });

            if creditor.amount > amount {
                creditors.push(Party::new(creditor.member(), creditor.amount - amount));
            }
            if debtor.amount > amount {
                debtors.push(Party::new(debtor.member(), debtor.amount - amount));
            }
        }

        info!(
            parties,
            transfers = plan.transfers.len(),
            "settlement plan computed"
        );

        Ok(plan)
    }

    /// Applies `transfers` in order: the payer's balance rises, the payee's falls.
    ///
    /// Members not yet present are inserted at zero.
    ///
    /// # Errors
    ///
    /// Returns `AmountOverflow` if any balance leaves the `i64` range.
    pub fn apply_transfers(
        balances: &BalanceMap,
        transfers: &[Transfer],
    ) -> Result<BalanceMap, SettlementError> {
        let mut result = balances.clone();
        for transfer in transfers {
            let from = result.entry(transfer.from_member).or_insert(0);
            *from = from
                .checked_add(transfer.amount)
                .ok_or(SettlementError::AmountOverflow)?;
            let to = result.entry(transfer.to_member).or_insert(0);
            *to = to
                .checked_sub(transfer.amount)
                .ok_or(SettlementError::AmountOverflow)?;
        }
        Ok(result)
    }
}
