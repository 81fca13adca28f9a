//! Expense records and the payloads used to create and patch them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{category::Category, common::*};

/// One recorded spending event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub amount: f64,
    pub category: Category,
    /// When the spend happened, as chosen by the user.
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub note: String,
    /// Audit stamp only; never used for filtering or ordering.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub(crate) fn from_new(id: String, data: NewExpense, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            amount: data.amount,
            category: data.category,
            date: data.date,
            note: data.note,
            created_at,
        }
    }

    /// Overwrites the fields present in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: ExpensePatch) {
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(note) = patch.note {
            self.note = note;
        }
    }
}

impl Identifiable for Expense {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        if self.note.is_empty() {
            format!(
                "{} {} ({})",
                self.date.format("%Y-%m-%d"),
                self.category,
                self.amount
            )
        } else {
            format!(
                "{} {} ({}) - {}",
                self.date.format("%Y-%m-%d"),
                self.category,
                self.amount,
                self.note
            )
        }
    }
}

/// Caller-supplied fields for a new expense. Amount positivity is checked by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub amount: f64,
    pub category: Category,
    pub date: DateTime<Utc>,
    pub note: String,
}

impl NewExpense {
    pub fn new(amount: f64, category: Category, date: DateTime<Utc>) -> Self {
        Self {
            amount,
            category,
            date,
            note: String::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// Partial update for an expense. `id` and `created_at` are not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    pub amount: Option<f64>,
    pub category: Option<Category>,
    pub date: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
            && self.note.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Expense {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 0, 0, 0).unwrap();
        Expense::from_new(
            "abc123".into(),
            NewExpense::new(42.5, Category::Food, date).with_note("lunch"),
            Utc.timestamp_millis_opt(1_710_000_000_000).unwrap(),
        )
    }

    #[test]
    fn apply_only_touches_given_fields() {
        let mut expense = sample();
        let before = expense.clone();
        expense.apply(ExpensePatch {
            note: Some("dinner".into()),
            ..ExpensePatch::default()
        });
        assert_eq!(expense.note, "dinner");
        assert_eq!(expense.amount, before.amount);
        assert_eq!(expense.category, before.category);
        assert_eq!(expense.date, before.date);
        assert_eq!(expense.created_at, before.created_at);
    }

    #[test]
    fn json_uses_camel_case_and_epoch_millis() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["createdAt"], 1_710_000_000_000i64);
        assert_eq!(json["category"], "Food");
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn reads_records_written_with_fractional_iso_dates() {
        let raw = r#"{"id":"k3j9x0a1b","amount":12,"category":"Travel",
            "date":"2024-05-03T00:00:00.000Z","note":"","createdAt":1714694400000}"#;
        let expense: Expense = serde_json::from_str(raw).unwrap();
        assert_eq!(expense.category, Category::Travel);
        assert_eq!(
            expense.date,
            Utc.with_ymd_and_hms(2024, 5, 3, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn label_includes_note_only_when_present() {
        let mut expense = sample();
        assert_eq!(expense.display_label(), "2024-03-09 Food (42.5) - lunch");
        expense.note.clear();
        assert_eq!(expense.display_label(), "2024-03-09 Food (42.5)");
    }
}
