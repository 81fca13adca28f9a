//! Durable expense and budget records on top of a [`KeyValueStore`].
//!
//! Every operation here succeeds from the caller's point of view. Unreadable
//! collections are treated as empty and failed writes are logged, so a damaged
//! data file degrades the tracker to "no data" instead of making it unusable.
//! Writes always rewrite the whole collection; the store assumes a single
//! writer and offers no isolation between interleaved calls.

use std::collections::HashSet;

use chrono::{SubsecRound, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::{
    domain::{Budget, Expense, ExpensePatch, Identifiable, MonthPeriod, NewExpense},
    errors::StoreError,
    storage::{KeyValueStore, MemoryStore, BUDGETS_KEY, EXPENSES_KEY},
};

/// Sole reader and writer of persisted expenses and budgets.
pub struct ExpenseStore {
    storage: Box<dyn KeyValueStore>,
}

impl ExpenseStore {
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Store backed by a fresh [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    /// All expenses, most recent spend first. Equal dates keep their stored order.
    pub fn list_expenses(&self) -> Vec<Expense> {
        let mut expenses: Vec<Expense> = self.load_collection(EXPENSES_KEY);
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        expenses
    }

    pub fn list_expenses_by_month(&self, period: MonthPeriod) -> Vec<Expense> {
        self.list_expenses()
            .into_iter()
            .filter(|expense| period.contains(expense.date))
            .collect()
    }

    pub fn find_expense(&self, id: &str) -> Option<Expense> {
        self.load_collection::<Expense>(EXPENSES_KEY)
            .into_iter()
            .find(|expense| expense.id == id)
    }

    /// Stores a new expense under a freshly generated id and returns it.
    ///
    /// `data` is stored as given; rejecting non-positive amounts is the caller's job.
    pub fn add_expense(&self, data: NewExpense) -> Expense {
        let mut expenses: Vec<Expense> = self.load_collection(EXPENSES_KEY);
        let id = fresh_id(&expenses);
        // Stamps persist at millisecond precision.
        let expense = Expense::from_new(id, data, Utc::now().trunc_subsecs(3));
        expenses.push(expense.clone());
        self.persist(EXPENSES_KEY, &expenses);
        tracing::debug!(id = %expense.id, amount = expense.amount, "expense added");
        expense
    }

    /// Merges `patch` over the expense with `id`. Unknown ids are ignored.
    pub fn update_expense(&self, id: &str, patch: ExpensePatch) {
        let mut expenses: Vec<Expense> = self.load_collection(EXPENSES_KEY);
        let Some(expense) = expenses.iter_mut().find(|expense| expense.id == id) else {
            tracing::debug!(id, "update skipped, expense not found");
            return;
        };
        expense.apply(patch);
        self.persist(EXPENSES_KEY, &expenses);
    }

    /// Removes the expense with `id` if present. Deleting twice is harmless.
    pub fn delete_expense(&self, id: &str) {
        let mut expenses: Vec<Expense> = self.load_collection(EXPENSES_KEY);
        let before = expenses.len();
        expenses.retain(|expense| expense.id != id);
        if expenses.len() == before {
            tracing::debug!(id, "delete skipped, expense not found");
            return;
        }
        self.persist(EXPENSES_KEY, &expenses);
    }

    /// Budget for `period`, or `0.0` when none is configured.
    pub fn get_budget(&self, period: MonthPeriod) -> f64 {
        self.budget_for(period).unwrap_or(0.0)
    }

    /// Budget for `period`, with `None` meaning "never set".
    pub fn budget_for(&self, period: MonthPeriod) -> Option<f64> {
        self.list_budgets()
            .into_iter()
            .find(|budget| budget.covers(period))
            .map(|budget| budget.amount)
    }

    /// Creates or overwrites the single budget record for `period`.
    pub fn set_budget(&self, period: MonthPeriod, amount: f64) {
        let mut budgets = self.list_budgets();
        match budgets.iter_mut().find(|budget| budget.covers(period)) {
            Some(existing) => existing.amount = amount,
            None => budgets.push(Budget::new(period, amount)),
        }
        self.persist(BUDGETS_KEY, &budgets);
    }

    pub fn list_budgets(&self) -> Vec<Budget> {
        self.load_collection(BUDGETS_KEY)
    }

    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(key, %err, "failed to read collection, treating it as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(key, %err, "stored collection is corrupt, treating it as empty");
                Vec::new()
            }
        }
    }

    fn persist<T: Serialize>(&self, key: &str, items: &[T]) {
        let result = serde_json::to_string(items)
            .map_err(StoreError::from)
            .and_then(|json| self.storage.set(key, &json));
        if let Err(err) = result {
            tracing::error!(key, %err, "failed to persist collection");
        }
    }
}

fn fresh_id(existing: &[Expense]) -> String {
    let taken: HashSet<&str> = existing.iter().map(Identifiable::id).collect();
    loop {
        let candidate = Uuid::new_v4().simple().to_string();
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
    }
}
