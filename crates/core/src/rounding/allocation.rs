//! Share rounding with remainder reconciliation.
//!
//! Every share is first rounded according to the group's policy, which in general
//! over- or under-allocates the total by a few units. Those units are then handed
//! back (or out) one at a time:
//!
//! 1. Order shares by descending fractional remainder, ties by ascending member id
//! 2. Walk that order, moving one minor unit per share until the sum matches
//!
//! The result always sums to the total exactly; no unit is dropped or duplicated.

use std::cmp::Reverse;

use divvy_shared::types::{MemberId, RoundingPolicy};
use tracing::debug;

use crate::error::SettlementError;
use crate::expense::ExactAmount;

/// Resolves exact shares to whole minor units under a [`RoundingPolicy`].
pub struct ShareRounder;

impl ShareRounder {
    /// Rounds `raw` shares, which must sum to `total` exactly, to whole minor units.
    ///
    /// The output keeps the input order and sums to `total`.
    ///
    /// - `none`: every share must already be whole
    /// - `round_up`: round away from zero, then take the surplus back from the shares
    ///   with the largest remainders
    /// - `round_down`: round toward zero, then give the shortfall to the shares with
    ///   the largest remainders
    ///
    /// # Example
    ///
    /// ```
    /// use divvy_core::{ExactAmount, ShareRounder};
    /// use divvy_shared::types::{MemberId, RoundingPolicy};
    ///
    /// let third = ExactAmount::new(100, 3).unwrap();
    /// let (a, b, c) = (MemberId::new(), MemberId::new(), MemberId::new());
    /// let shares = ShareRounder::apply(&[(a, third), (b, third), (c, third)], 100, RoundingPolicy::RoundDown)
    ///     .unwrap();
    /// assert_eq!(shares.iter().map(|(_, s)| s).sum::<i64>(), 100);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `AllocationMismatch` if the raw shares do not sum to `total`,
    /// `Unroundable` for a fractional share under policy `none`, or `AmountOverflow`.
    pub fn apply(
        raw: &[(MemberId, ExactAmount)],
        total: i64,
        policy: RoundingPolicy,
    ) -> Result<Vec<(MemberId, i64)>, SettlementError> {
        let raw_sum = ExactAmount::checked_sum(raw.iter().map(|(_, amount)| *amount))
            .ok_or(SettlementError::AmountOverflow)?;
        if raw_sum != ExactAmount::from_minor(total) {
            return Err(SettlementError::AllocationMismatch {
                expected: total,
                actual: raw_sum,
            });
        }

        let mut rounded: Vec<i128> = match policy {
            RoundingPolicy::None => {
                if let Some((member_id, amount)) =
                    raw.iter().find(|(_, amount)| !amount.is_integer())
                {
                    return Err(SettlementError::Unroundable {
                        member_id: *member_id,
                        amount: *amount,
                    });
                }
                raw.iter().map(|(_, amount)| amount.numer()).collect()
            }
            RoundingPolicy::RoundUp => raw.iter().map(|(_, amount)| amount.round_away()).collect(),
            RoundingPolicy::RoundDown => raw.iter().map(|(_, amount)| amount.trunc()).collect(),
        };

        let rounded_sum = rounded
            .iter()
            .try_fold(0_i128, |acc, v| acc.checked_add(*v))
            .ok_or(SettlementError::AmountOverflow)?;
        let drift = rounded_sum - i128::from(total);

        if drift != 0 {
            let units = usize::try_from(drift.unsigned_abs())
                .map_err(|_| SettlementError::AmountOverflow)?;
            let step = -drift.signum();

            let mut order: Vec<usize> = (0..raw.len()).collect();
            order.sort_by_key(|&i| (Reverse(raw[i].1.fract_magnitude()), raw[i].0, i));

            for &i in order.iter().cycle().take(units) {
                rounded[i] += step;
            }

            debug!(%policy, units, "reconciled rounding remainder");
        }

        raw.iter()
            .zip(rounded)
            .map(|((member_id, _), minor)| {
                i64::try_from(minor)
                    .map(|minor| (*member_id, minor))
                    .map_err(|_| SettlementError::AmountOverflow)
            })
            .collect()
    }
}
