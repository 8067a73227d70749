//! Rounding policy application.
//!
//! Keeps every share on an exact minor-unit boundary while preserving
//! "sum of shares = total" under every policy.

pub mod allocation;

#[cfg(test)]
mod props;

pub use allocation::ShareRounder;
