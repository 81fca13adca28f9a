//! Totals, category breakdowns and month-over-month comparisons.

use std::cmp::Ordering;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::core::expense_store::ExpenseStore;
use crate::domain::{Amounted, Category, Expense, MonthPeriod};

/// Per-category slice of an expense set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub total: f64,
    /// Share of the overall total, 0–100. Zero when the overall total is zero.
    pub percentage: f64,
    pub count: usize,
}

/// Change between two totals. A zero prior total reports 0% rather than infinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthDelta {
    pub absolute_diff: f64,
    pub percentage_change: f64,
}

/// Everything a monthly overview screen needs, computed in one pass over the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthReport {
    pub period: MonthPeriod,
    pub total: f64,
    pub expense_count: usize,
    pub budget: Option<f64>,
    pub remaining: Option<f64>,
    pub budget_used_percentage: Option<f64>,
    /// Spend per elapsed day; see [`SummaryService::daily_average`].
    pub daily_average: f64,
    pub breakdown: Vec<CategoryBreakdown>,
    pub delta: MonthDelta,
}

pub struct SummaryService;

impl SummaryService {
    pub fn monthly_total(expenses: &[Expense]) -> f64 {
        expenses.iter().map(Amounted::amount).sum()
    }

    /// One entry per category, zero-spend categories included, largest total first.
    pub fn category_breakdown(expenses: &[Expense]) -> Vec<CategoryBreakdown> {
        let overall = Self::monthly_total(expenses);
        let mut rows: Vec<CategoryBreakdown> = Category::iter()
            .map(|category| {
                let (total, count) = expenses
                    .iter()
                    .filter(|expense| expense.category == category)
                    .fold((0.0, 0), |(sum, count), expense| {
                        (sum + expense.amount, count + 1)
                    });
                CategoryBreakdown {
                    category,
                    total,
                    percentage: if overall > 0.0 {
                        total / overall * 100.0
                    } else {
                        0.0
                    },
                    count,
                }
            })
            .collect();
        rows.sort_by(|a, b| b.total.total_cmp(&a.total));
        rows
    }

    pub fn month_over_month_delta(current_total: f64, prior_total: f64) -> MonthDelta {
        let absolute_diff = current_total - prior_total;
        let percentage_change = if prior_total > 0.0 {
            absolute_diff / prior_total * 100.0
        } else {
            0.0
        };
        MonthDelta {
            absolute_diff,
            percentage_change,
        }
    }

    /// Average spend per day of `period` as seen on `today`.
    ///
    /// The running month divides by the days elapsed so far, including today.
    /// Past months divide by their full length. Future months report zero.
    pub fn daily_average(total: f64, period: MonthPeriod, today: DateTime<Utc>) -> f64 {
        let days = match period.cmp(&MonthPeriod::containing(today)) {
            Ordering::Equal => today.day(),
            Ordering::Less => period.day_count(),
            Ordering::Greater => 0,
        };
        if days == 0 {
            0.0
        } else {
            total / f64::from(days)
        }
    }

    pub fn total_for_month(store: &ExpenseStore, period: MonthPeriod) -> f64 {
        Self::monthly_total(&store.list_expenses_by_month(period))
    }

    /// Total for the month `months_back` months before the one containing `reference`.
    pub fn total_with_offset(
        store: &ExpenseStore,
        reference: DateTime<Utc>,
        months_back: u32,
    ) -> f64 {
        let period = MonthPeriod::containing(reference).shift_back(months_back);
        Self::total_for_month(store, period)
    }

    pub fn month_report(store: &ExpenseStore, period: MonthPeriod) -> MonthReport {
        Self::month_report_at(store, period, Utc::now())
    }

    /// [`SummaryService::month_report`] evaluated as of `today`.
    pub fn month_report_at(
        store: &ExpenseStore,
        period: MonthPeriod,
        today: DateTime<Utc>,
    ) -> MonthReport {
        let expenses = store.list_expenses_by_month(period);
        let total = Self::monthly_total(&expenses);
        let prior_total = Self::total_for_month(store, period.previous());
        let budget = store.budget_for(period);
        let remaining = budget.map(|limit| limit - total);
        let budget_used_percentage = budget.map(|limit| {
            if limit > 0.0 {
                total / limit * 100.0
            } else {
                0.0
            }
        });
        MonthReport {
            period,
            total,
            expense_count: expenses.len(),
            budget,
            remaining,
            budget_used_percentage,
            daily_average: Self::daily_average(total, period, today),
            breakdown: Self::category_breakdown(&expenses),
            delta: Self::month_over_month_delta(total, prior_total),
        }
    }
}
