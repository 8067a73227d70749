//! Common types used across the application.

pub mod id;
pub mod money;
pub mod rounding;

pub use id::*;
pub use money::{Currency, MoneyError, from_minor_units, to_minor_units};
pub use rounding::RoundingPolicy;
