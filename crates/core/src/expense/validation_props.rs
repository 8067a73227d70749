//! Property-based tests for share validation.
//!
//! - Exact splits always validate
//! - Any single-unit perturbation is caught as a mismatch
//! - Repeating a member is always caught

use divvy_shared::types::{ExpenseId, MemberId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::amount::ExactAmount;
use super::split::Split;
use super::types::{Expense, ExpenseShare};
use super::validation::ShareValidator;
use crate::error::SettlementError;

/// Strategy to generate a positive expense amount in minor units.
fn positive_amount() -> impl Strategy<Value = i64> {
    1i64..10_000_000
}

/// Strategy to generate 1-20 distinct members.
fn members() -> impl Strategy<Value = Vec<MemberId>> {
    prop::collection::btree_set(1u128..1_000, 1..20).prop_map(|ids| {
        ids.into_iter()
            .map(|n| MemberId::from_uuid(Uuid::from_u128(n)))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* amount and member set, an equal split validates.
    #[test]
    fn prop_equal_split_validates(amount in positive_amount(), members in members()) {
        let expense = Split::Equal(members).build_expense(ExpenseId::new(), amount, MemberId::new());
        prop_assert!(expense.is_ok(), "equal split rejected: {:?}", expense);
    }

    /// *For any* positive weights, a weighted split validates.
    #[test]
    fn prop_weighted_split_validates(
        amount in positive_amount(),
        members in members(),
        raw_weights in prop::collection::vec(1i64..10_000, 20),
    ) {
        let weights = members
            .iter()
            .zip(raw_weights)
            .map(|(member, w)| (*member, Decimal::new(w, 2)))
            .collect();
        let expense = Split::Weighted(weights).build_expense(ExpenseId::new(), amount, MemberId::new());
        prop_assert!(expense.is_ok(), "weighted split rejected: {:?}", expense);
    }

    /// *For any* valid expense, nudging one share by one unit SHALL be rejected
    /// with the exact expected and actual sums.
    #[test]
    fn prop_perturbed_share_mismatch(
        amount in positive_amount(),
        members in members(),
        index in any::<prop::sample::Index>(),
    ) {
        let mut expense = Split::Equal(members)
            .build_expense(ExpenseId::new(), amount, MemberId::new())
            .unwrap();
        let i = index.index(expense.shares.len());
        expense.shares[i].share_amount = expense.shares[i]
            .share_amount
            .checked_add(ExactAmount::from_minor(1))
            .unwrap();

        let result = ShareValidator::validate(&expense);
        prop_assert_eq!(
            result,
            Err(SettlementError::ShareMismatch {
                expense_id: expense.id,
                expected: amount,
                actual: ExactAmount::from_minor(amount + 1),
            })
        );
    }

    /// *For any* expense, repeating a member SHALL be rejected as a duplicate.
    #[test]
    fn prop_duplicate_member_rejected(
        amount in 2i64..10_000_000,
        members in members(),
    ) {
        let member = members[0];
        let expense = Expense {
            id: ExpenseId::new(),
            amount,
            paid_by: member,
            shares: vec![
                ExpenseShare::new(member, amount - 1),
                ExpenseShare::new(member, 1_i64),
            ],
        };
        prop_assert!(
            matches!(
                ShareValidator::validate(&expense),
                Err(SettlementError::DuplicateShare { member_id, .. }) if member_id == member
            ),
            "duplicate member accepted"
        );
    }
}
