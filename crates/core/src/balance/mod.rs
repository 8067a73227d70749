//! Net balance aggregation.
//!
//! Folds a group's validated expenses and manual settlements into one signed
//! balance per member. Balances always sum to zero.

pub mod aggregator;

#[cfg(test)]
mod props;

pub use aggregator::{BalanceAggregator, BalanceMap, DebtSummary};
