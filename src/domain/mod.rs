//! Plain data records owned by the expense store.

pub mod budget;
pub mod category;
pub mod common;
pub mod expense;

pub use budget::Budget;
pub use category::{Category, UnknownCategory};
pub use common::{Amounted, Displayable, Identifiable, MonthPeriod};
pub use expense::{Expense, ExpensePatch, NewExpense};

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
