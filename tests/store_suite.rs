mod common;

use std::fs;

use common::{day, setup_file_store, spend};
use expense_core::{
    domain::{Category, ExpensePatch, MonthPeriod, NewExpense},
    storage::{KeyValueStore, BUDGETS_KEY, EXPENSES_KEY},
    ExpenseStore,
};
use regex::Regex;

#[test]
fn records_survive_a_new_store_over_the_same_files() {
    let (store, files) = setup_file_store();
    let added = store.add_expense(
        NewExpense::new(250.0, Category::Bills, day(2024, 4, 2)).with_note("electricity"),
    );
    store.set_budget(MonthPeriod::new(3, 2024).unwrap(), 9000.0);

    let reopened = ExpenseStore::new(Box::new(files));
    let expenses = reopened.list_expenses();
    assert_eq!(expenses, vec![added]);
    assert_eq!(
        reopened.get_budget(MonthPeriod::new(3, 2024).unwrap()),
        9000.0
    );
}

#[test]
fn ids_are_unique_hex_tokens() {
    let (store, _files) = setup_file_store();
    let shape = Regex::new(r"^[0-9a-f]{32}$").unwrap();
    let ids: Vec<String> = (0..20)
        .map(|i| spend(&store, 1.0 + i as f64, Category::Food, day(2024, 1, 1)).id)
        .collect();
    assert!(ids.iter().all(|id| shape.is_match(id)));
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
}

#[test]
fn persisted_layout_uses_camel_case_and_epoch_millis() {
    let (store, files) = setup_file_store();
    spend(&store, 40.0, Category::Travel, day(2024, 5, 6));
    let raw = files.get(EXPENSES_KEY).unwrap().expect("collection written");
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &value[0];
    assert_eq!(record["category"], "Travel");
    assert_eq!(record["amount"], 40.0);
    assert!(record["createdAt"].is_i64());
    assert_eq!(record["date"], "2024-05-06T12:00:00Z");
}

#[test]
fn month_filter_uses_calendar_boundaries() {
    let (store, _files) = setup_file_store();
    spend(&store, 1.0, Category::Food, day(2024, 1, 31));
    spend(&store, 2.0, Category::Food, day(2024, 2, 1));
    spend(&store, 3.0, Category::Food, day(2024, 2, 29));
    spend(&store, 4.0, Category::Food, day(2023, 2, 10));

    let february = store.list_expenses_by_month(MonthPeriod::new(1, 2024).unwrap());
    let amounts: Vec<f64> = february.iter().map(|e| e.amount).collect();
    assert_eq!(amounts, vec![3.0, 2.0]);
}

#[test]
fn update_merges_only_given_fields() {
    let (store, _files) = setup_file_store();
    let original = store.add_expense(
        NewExpense::new(10.0, Category::Food, day(2024, 6, 1)).with_note("lunch"),
    );
    store.update_expense(
        &original.id,
        ExpensePatch {
            amount: Some(12.0),
            ..ExpensePatch::default()
        },
    );
    let updated = store.find_expense(&original.id).unwrap();
    assert_eq!(updated.amount, 12.0);
    assert_eq!(updated.note, "lunch");
    assert_eq!(updated.category, Category::Food);
    assert_eq!(updated.created_at, original.created_at);
}

#[test]
fn unknown_ids_are_ignored_by_update_and_delete() {
    let (store, _files) = setup_file_store();
    let kept = spend(&store, 5.0, Category::Other, day(2024, 6, 1));
    store.update_expense(
        "missing",
        ExpensePatch {
            amount: Some(99.0),
            ..ExpensePatch::default()
        },
    );
    store.delete_expense("missing");
    assert_eq!(store.list_expenses(), vec![kept]);
}

#[test]
fn delete_is_idempotent() {
    let (store, _files) = setup_file_store();
    let gone = spend(&store, 5.0, Category::Other, day(2024, 6, 1));
    let kept = spend(&store, 6.0, Category::Other, day(2024, 6, 2));
    store.delete_expense(&gone.id);
    store.delete_expense(&gone.id);
    assert_eq!(store.list_expenses(), vec![kept]);
}

#[test]
fn budget_overwrite_keeps_a_single_record() {
    let (store, _files) = setup_file_store();
    let june = MonthPeriod::new(5, 2024).unwrap();
    assert_eq!(store.get_budget(june), 0.0);
    assert_eq!(store.budget_for(june), None);
    store.set_budget(june, 1000.0);
    store.set_budget(june, 1500.0);
    store.set_budget(MonthPeriod::new(6, 2024).unwrap(), 800.0);
    assert_eq!(store.get_budget(june), 1500.0);
    assert_eq!(store.list_budgets().len(), 2);
}

#[test]
fn zero_budget_is_distinguishable_from_unset() {
    let (store, _files) = setup_file_store();
    let period = MonthPeriod::new(0, 2025).unwrap();
    store.set_budget(period, 0.0);
    assert_eq!(store.budget_for(period), Some(0.0));
    assert_eq!(store.get_budget(period), 0.0);
}

#[test]
fn corrupt_files_read_as_empty_and_recover_on_next_write() {
    let (store, files) = setup_file_store();
    fs::write(files.key_path(EXPENSES_KEY), "[{\"id\": tru").unwrap();
    fs::write(files.key_path(BUDGETS_KEY), "not json").unwrap();

    assert!(store.list_expenses().is_empty());
    assert_eq!(store.get_budget(MonthPeriod::new(0, 2024).unwrap()), 0.0);

    let added = spend(&store, 7.5, Category::Shopping, day(2024, 1, 9));
    assert_eq!(store.list_expenses(), vec![added]);
}

#[test]
fn overwrites_leave_bounded_snapshots() {
    let (store, files) = setup_file_store();
    for i in 0..6 {
        spend(&store, 1.0 + i as f64, Category::Food, day(2024, 1, 1));
    }
    let backups = files.list_backups(EXPENSES_KEY).unwrap();
    assert_eq!(backups.len(), 3);
    assert!(backups.iter().all(|info| info.key == EXPENSES_KEY));
    let sizes: Vec<usize> = backups
        .iter()
        .map(|info| {
            let raw = fs::read_to_string(&info.path).unwrap();
            serde_json::from_str::<Vec<serde_json::Value>>(&raw).unwrap().len()
        })
        .collect();
    assert_eq!(sizes, vec![5, 4, 3]);
}

#[test]
fn quick_writes_can_be_rolled_back_to_each_pre_state() {
    let (store, files) = setup_file_store();
    let first = spend(&store, 1.0, Category::Food, day(2024, 1, 1));
    let second = spend(&store, 2.0, Category::Food, day(2024, 1, 2));
    store.delete_expense(&first.id);

    let backups = files.list_backups(EXPENSES_KEY).unwrap();
    assert_eq!(backups.len(), 2);
    let oldest = fs::read_to_string(&backups[1].path).unwrap();
    fs::write(files.key_path(EXPENSES_KEY), oldest).unwrap();
    assert_eq!(store.list_expenses(), vec![first.clone()]);

    let middle = fs::read_to_string(&backups[0].path).unwrap();
    fs::write(files.key_path(EXPENSES_KEY), middle).unwrap();
    assert_eq!(store.list_expenses(), vec![second, first]);
}
