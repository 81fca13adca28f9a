//! Shared traits and the calendar month value type used across the crate.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Exposes the opaque identifier of a stored record.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Supplies a common contract for retrieving monetary magnitudes.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Names one calendar month. `month` is zero-based (0 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthPeriod {
    pub year: i32,
    pub month: u32,
}

impl MonthPeriod {
    /// Builds a period, returning `None` when `month` is outside 0..=11.
    pub fn new(month: u32, year: i32) -> Option<Self> {
        (month < 12).then_some(Self { year, month })
    }

    /// Builds a period from a one-based month as typed by users.
    pub fn from_human(month: u32, year: i32) -> Option<Self> {
        month.checked_sub(1).and_then(|zero| Self::new(zero, year))
    }

    pub fn containing(date: DateTime<Utc>) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    pub fn current() -> Self {
        Self::containing(Utc::now())
    }

    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        date.year() == self.year && date.month0() == self.month
    }

    /// The immediately preceding calendar month; January rolls into the prior year.
    pub fn previous(&self) -> Self {
        self.shift_back(1)
    }

    pub fn shift_back(&self, months: u32) -> Self {
        let index = i64::from(self.year) * 12 + i64::from(self.month) - i64::from(months);
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32,
        }
    }

    /// One-based month number for display and file names.
    pub fn human_month(&self) -> u32 {
        self.month + 1
    }

    /// Number of calendar days in the month; zero for years chrono cannot represent.
    pub fn day_count(&self) -> u32 {
        let first = NaiveDate::from_ymd_opt(self.year, self.human_month(), 1);
        let (next_year, next_month) = if self.month == 11 {
            (self.year + 1, 1)
        } else {
            (self.year, self.human_month() + 1)
        };
        let next = NaiveDate::from_ymd_opt(next_year, next_month, 1);
        match (first, next) {
            (Some(first), Some(next)) => (next - first).num_days() as u32,
            _ => 0,
        }
    }
}

impl fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.human_month(), self.year)
    }
}
