pub mod json_backend;
pub mod memory;

use crate::errors::Result;

/// Key under which the expense collection is stored.
pub const EXPENSES_KEY: &str = "expense_tracker_data";
/// Key under which the budget collection is stored.
pub const BUDGETS_KEY: &str = "expense_tracker_budgets";

/// Minimal keyed persistence capability. Values are whole serialized collections;
/// every `set` replaces the previous value for that key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

pub use json_backend::{BackupInfo, JsonFileStore};
pub use memory::MemoryStore;
