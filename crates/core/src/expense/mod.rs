//! Expense records, split builders and share validation.

pub mod amount;
pub mod split;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use amount::ExactAmount;
pub use split::Split;
pub use types::{Expense, ExpenseShare, ManualSettlement};
pub use validation::ShareValidator;
