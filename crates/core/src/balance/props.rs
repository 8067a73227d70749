//! Property-based tests for balance aggregation.
//!
//! - Property 1: Balances sum to zero for any valid history
//! - Property 2: Every referenced member gets an entry
//! - Property 3: The debt summary agrees with the net balance map

use std::collections::BTreeSet;

use divvy_shared::types::{ExpenseId, MemberId, RoundingPolicy, SettlementId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::aggregator::BalanceAggregator;
use crate::expense::{Expense, ManualSettlement, Split};

fn member(n: u128) -> MemberId {
    MemberId::from_uuid(Uuid::from_u128(n))
}

/// Strategy to generate a rounding policy that accepts fractional shares.
fn lenient_policy() -> impl Strategy<Value = RoundingPolicy> {
    prop_oneof![Just(RoundingPolicy::RoundUp), Just(RoundingPolicy::RoundDown)]
}

/// Strategy to generate one expense among members 1-8, split equally or by weight.
fn expense() -> impl Strategy<Value = Expense> {
    (
        1i64..1_000_000,
        1u128..=8,
        prop::collection::btree_map(1u128..=8, 1i64..500, 1..8),
        any::<bool>(),
    )
        .prop_map(|(amount, payer, weights, equal)| {
            let split = if equal {
                Split::Equal(weights.keys().map(|n| member(*n)).collect())
            } else {
                Split::Weighted(
                    weights
                        .into_iter()
                        .map(|(n, w)| (member(n), Decimal::from(w)))
                        .collect(),
                )
            };
            split
                .build_expense(ExpenseId::new(), amount, member(payer))
                .unwrap()
        })
}

/// Strategy to generate a manual settlement between two distinct members 1-10.
fn settlement() -> impl Strategy<Value = ManualSettlement> {
    (1u128..=10, 1u128..10, 1i64..100_000).prop_map(|(from, offset, amount)| {
        let to = (from + offset - 1) % 10 + 1;
        ManualSettlement::new(SettlementId::new(), member(from), member(to), amount)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* valid expenses and settlements, net balances SHALL sum to zero.
    #[test]
    fn prop_balances_sum_to_zero(
        expenses in prop::collection::vec(expense(), 0..20),
        settlements in prop::collection::vec(settlement(), 0..10),
        policy in lenient_policy(),
    ) {
        let balances = BalanceAggregator::aggregate(&expenses, &settlements, policy).unwrap();
        prop_assert_eq!(balances.values().map(|b| i128::from(*b)).sum::<i128>(), 0);
    }

    /// *For any* history, every payer, share holder and settlement party SHALL appear.
    #[test]
    fn prop_every_member_listed(
        expenses in prop::collection::vec(expense(), 0..20),
        settlements in prop::collection::vec(settlement(), 0..10),
        policy in lenient_policy(),
    ) {
        let balances = BalanceAggregator::aggregate(&expenses, &settlements, policy).unwrap();

        let mut expected = BTreeSet::new();
        for expense in &expenses {
            expected.insert(expense.paid_by);
            expected.extend(expense.shares.iter().map(|s| s.member_id));
        }
        for settlement in &settlements {
            expected.insert(settlement.from_member);
            expected.insert(settlement.to_member);
        }

        prop_assert_eq!(balances.keys().copied().collect::<BTreeSet<_>>(), expected);
    }

    /// *For any* history, each summary row SHALL reconcile to its net balance.
    #[test]
    fn prop_summary_reconciles(
        expenses in prop::collection::vec(expense(), 0..20),
        settlements in prop::collection::vec(settlement(), 0..10),
        policy in lenient_policy(),
    ) {
        let summary = BalanceAggregator::summarize(&expenses, &settlements, policy).unwrap();
        let balances = BalanceAggregator::aggregate(&expenses, &settlements, policy).unwrap();

        prop_assert_eq!(summary.len(), balances.len());
        for row in &summary {
            prop_assert_eq!(
                row.net_balance,
                row.total_paid - row.total_share + row.settlements_paid - row.settlements_received
            );
            prop_assert_eq!(balances.get(&row.member_id), Some(&row.net_balance));
        }
        prop_assert_eq!(
            summary.iter().map(|r| r.total_paid).sum::<i64>(),
            summary.iter().map(|r| r.total_share).sum::<i64>()
        );
    }
}
