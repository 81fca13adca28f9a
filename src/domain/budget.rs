use serde::{Deserialize, Serialize};

use crate::domain::common::MonthPeriod;

/// Spending ceiling for one calendar month. At most one exists per period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Zero-based month index.
    pub month: u32,
    pub year: i32,
    pub amount: f64,
}

impl Budget {
    pub fn new(period: MonthPeriod, amount: f64) -> Self {
        Self {
            month: period.month,
            year: period.year,
            amount,
        }
    }

    pub fn period(&self) -> MonthPeriod {
        MonthPeriod {
            year: self.year,
            month: self.month,
        }
    }

    pub fn covers(&self, period: MonthPeriod) -> bool {
        self.period() == period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_only_its_own_month() {
        let june = MonthPeriod::new(5, 2024).unwrap();
        let budget = Budget::new(june, 1000.0);
        assert_eq!(budget.period(), june);
        assert!(budget.covers(june));
        assert!(!budget.covers(june.previous()));
        assert!(!budget.covers(MonthPeriod::new(5, 2025).unwrap()));
    }

    #[test]
    fn serializes_month_year_amount() {
        let budget = Budget::new(MonthPeriod::new(0, 2025).unwrap(), 250.0);
        let json = serde_json::to_value(&budget).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"month": 0, "year": 2025, "amount": 250.0})
        );
    }
}
