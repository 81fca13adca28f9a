//! CSV export of expense slices.
//!
//! The format is deliberately minimal: comma-delimited, no quoting, commas in
//! notes replaced by spaces. Files written by earlier versions use exactly this
//! layout, so the byte output must not change.

use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::core::{expense_store::ExpenseStore, utils::write_atomic};
use crate::domain::{Expense, MonthPeriod};
use crate::errors::{Result, StoreError};

const HEADER: [&str; 4] = ["Date", "Category", "Amount", "Note"];
const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct ExportService;

impl ExportService {
    /// Renders the header row plus one row per expense, in the given order.
    pub fn to_csv(expenses: &[Expense]) -> Result<String> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(HEADER)?;
        for expense in expenses {
            writer.write_record([
                expense.date.format(DATE_FORMAT).to_string(),
                expense.category.to_string(),
                expense.amount.to_string(),
                sanitize_note(&expense.note),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| StoreError::Io(err.into_error()))?;
        String::from_utf8(bytes).map_err(|err| {
            StoreError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
        })
    }

    /// `expenses_<month>_<year>.csv` with a one-based month.
    pub fn file_name(period: MonthPeriod) -> String {
        format!("expenses_{}_{}.csv", period.human_month(), period.year)
    }

    /// Writes the month's expenses to `dir` under [`ExportService::file_name`].
    pub fn export_month(store: &ExpenseStore, period: MonthPeriod, dir: &Path) -> Result<PathBuf> {
        let expenses = store.list_expenses_by_month(period);
        let csv = Self::to_csv(&expenses)?;
        let path = dir.join(Self::file_name(period));
        write_atomic(&path, &csv)?;
        tracing::info!(path = %path.display(), rows = expenses.len(), "exported expenses");
        Ok(path)
    }
}

fn sanitize_note(note: &str) -> String {
    note.replace(',', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, NewExpense};
    use chrono::{TimeZone, Utc};

    #[test]
    fn header_only_for_empty_slice() {
        assert_eq!(
            ExportService::to_csv(&[]).unwrap(),
            "Date,Category,Amount,Note\n"
        );
    }

    #[test]
    fn commas_in_notes_become_spaces() {
        let store = ExpenseStore::in_memory();
        let date = Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap();
        let expense = store.add_expense(
            NewExpense::new(12.5, Category::Food, date).with_note("coffee, and snacks"),
        );
        let csv = ExportService::to_csv(&[expense]).unwrap();
        assert_eq!(
            csv,
            "Date,Category,Amount,Note\n2024-06-03,Food,12.5,coffee  and snacks\n"
        );
    }

    #[test]
    fn file_name_uses_one_based_month() {
        let period = MonthPeriod::new(0, 2025).unwrap();
        assert_eq!(ExportService::file_name(period), "expenses_1_2025.csv");
    }
}
