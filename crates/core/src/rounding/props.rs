//! Property-based tests for share rounding.
//!
//! - Rounded shares always sum to the total (conservation)
//! - Every rounded share stays between the floor and ceiling of its raw value
//! - Policy `none` accepts exactly the all-whole inputs

use divvy_shared::types::{ExpenseId, MemberId, RoundingPolicy};
use proptest::prelude::*;
use uuid::Uuid;

use super::allocation::ShareRounder;
use crate::error::SettlementError;
use crate::expense::{ExactAmount, Split};

/// Strategy to generate a rounding policy.
fn policy() -> impl Strategy<Value = RoundingPolicy> {
    prop_oneof![
        Just(RoundingPolicy::None),
        Just(RoundingPolicy::RoundUp),
        Just(RoundingPolicy::RoundDown),
    ]
}

/// Strategy to generate exact raw shares (via weighted splits) and their total.
fn raw_shares() -> impl Strategy<Value = (Vec<(MemberId, ExactAmount)>, i64)> {
    (
        1i64..1_000_000,
        prop::collection::vec(1i64..1_000, 1..15),
    )
        .prop_map(|(total, weights)| {
            let split = Split::Weighted(
                weights
                    .into_iter()
                    .enumerate()
                    .map(|(i, w)| {
                        (
                            MemberId::from_uuid(Uuid::from_u128(i as u128 + 1)),
                            rust_decimal::Decimal::from(w),
                        )
                    })
                    .collect(),
            );
            let shares = split
                .raw_shares(ExpenseId::new(), total)
                .unwrap()
                .into_iter()
                .map(|s| (s.member_id, s.share_amount))
                .collect();
            (shares, total)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* raw shares summing to a total and any rounding policy, rounding
    /// SHALL return whole shares summing to exactly that total.
    #[test]
    fn prop_rounding_conserves_total((raw, total) in raw_shares(), policy in policy()) {
        match ShareRounder::apply(&raw, total, policy) {
            Ok(rounded) => {
                prop_assert_eq!(rounded.len(), raw.len());
                prop_assert_eq!(rounded.iter().map(|(_, s)| *s).sum::<i64>(), total);
            }
            Err(SettlementError::Unroundable { .. }) => {
                prop_assert_eq!(policy, RoundingPolicy::None);
                prop_assert!(raw.iter().any(|(_, s)| !s.is_integer()));
            }
            Err(other) => prop_assert!(false, "unexpected error: {:?}", other),
        }
    }

    /// *For any* input, each rounded share SHALL lie within one unit of its raw value.
    #[test]
    fn prop_rounded_share_within_one_unit(
        (raw, total) in raw_shares(),
        policy in prop_oneof![Just(RoundingPolicy::RoundUp), Just(RoundingPolicy::RoundDown)],
    ) {
        let rounded = ShareRounder::apply(&raw, total, policy).unwrap();
        for ((member, exact), (rounded_member, minor)) in raw.iter().zip(&rounded) {
            prop_assert_eq!(member, rounded_member);
            let floor = exact.numer().div_euclid(i128::from(exact.denom()));
            let ceil = if exact.is_integer() { floor } else { floor + 1 };
            prop_assert!(
                (floor..=ceil).contains(&i128::from(*minor)),
                "share {} rounded to {}", exact, minor
            );
        }
    }

    /// *For any* input, rounding SHALL be deterministic.
    #[test]
    fn prop_rounding_is_deterministic((raw, total) in raw_shares(), policy in policy()) {
        prop_assert_eq!(
            ShareRounder::apply(&raw, total, policy),
            ShareRounder::apply(&raw, total, policy)
        );
    }
}
