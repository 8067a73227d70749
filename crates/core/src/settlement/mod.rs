//! Settlement transfer minimization.

pub mod optimizer;

#[cfg(test)]
mod props;

pub use optimizer::{MatchStep, SettlementOptimizer, SettlementPlan, Transfer};
