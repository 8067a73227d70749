//! Debt settlement engine for Divvy.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Given one group's expenses and manual settlements it computes every member's
//! net balance and a short, deterministic list of transfers that closes all debts.
//!
//! All money is integer minor currency units; fractional shares are carried as
//! exact rationals until the group's rounding policy resolves them.
//!
//! # Modules
//!
//! - `expense` - Expense records, split builders and share validation
//! - `rounding` - Rounding policy application with remainder reconciliation
//! - `balance` - Net balance aggregation
//! - `settlement` - Greedy transfer minimization
//! - `ledger` - Per-group pipeline and multi-group batch runner

pub mod balance;
pub mod error;
pub mod expense;
pub mod ledger;
pub mod rounding;
pub mod settlement;

pub use balance::{BalanceAggregator, BalanceMap, DebtSummary};
pub use error::SettlementError;
pub use expense::{
    ExactAmount, Expense, ExpenseShare, ManualSettlement, ShareValidator, Split,
};
pub use ledger::{GroupLedger, GroupOutcome, GroupSettlement, LedgerService};
pub use rounding::ShareRounder;
pub use settlement::{MatchStep, SettlementOptimizer, SettlementPlan, Transfer};
