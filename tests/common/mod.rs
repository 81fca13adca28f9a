#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::{DateTime, TimeZone, Utc};
use expense_core::{
    domain::{Category, Expense, NewExpense},
    storage::JsonFileStore,
    ExpenseStore,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh directory that outlives the calling test.
pub fn scratch_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Store backed by JSON files in an isolated directory, plus that directory.
pub fn setup_file_store() -> (ExpenseStore, JsonFileStore) {
    let files = JsonFileStore::with_retention(scratch_dir().join("data"), 3)
        .expect("create json file store");
    (ExpenseStore::new(Box::new(files.clone())), files)
}

pub fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub fn spend(
    store: &ExpenseStore,
    amount: f64,
    category: Category,
    date: DateTime<Utc>,
) -> Expense {
    store.add_expense(NewExpense::new(amount, category, date))
}
