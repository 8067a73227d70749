//! Per-group settlement pipeline.
//!
//! Runs validation, rounding, aggregation and optimization for one group's
//! closed snapshot, or for many independent groups at once.

pub mod service;
pub mod types;

pub use service::LedgerService;
pub use types::{GroupLedger, GroupOutcome, GroupSettlement};
