pub mod expense_store;
pub mod services;
pub mod utils;

pub use expense_store::ExpenseStore;
