//! Argument parsing and input validation for shell commands.
//!
//! The store accepts whatever it is given, so positivity and format checks for
//! user-typed values live here, before any store call.

use chrono::{DateTime, NaiveDate, Utc};

use crate::cli::core::CommandError;
use crate::domain::{Category, ExpensePatch, MonthPeriod};

pub(crate) fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(CommandError::InvalidArguments(format!(
            "Please enter a valid amount (got `{raw}`)"
        ))),
    }
}

pub(crate) fn parse_budget_amount(raw: &str) -> Result<f64, CommandError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(CommandError::InvalidArguments(format!(
            "budget must be a non-negative number (got `{raw}`)"
        ))),
    }
}

pub(crate) fn parse_category(raw: &str) -> Result<Category, CommandError> {
    raw.parse::<Category>().map_err(|err| {
        let names: Vec<&str> = Category::iter().map(|c| c.as_str()).collect();
        CommandError::InvalidArguments(format!("{err}; expected one of {}", names.join(", ")))
    })
}

/// `YYYY-MM-DD` or `today`, interpreted as midnight UTC.
pub(crate) fn parse_date(raw: &str) -> Result<DateTime<Utc>, CommandError> {
    let date = if raw.eq_ignore_ascii_case("today") {
        Utc::now().date_naive()
    } else {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            CommandError::InvalidArguments(format!("invalid date `{raw}`, expected YYYY-MM-DD"))
        })?
    };
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Optional leading date of `add`. Free text yields `None`; text shaped like
/// `YYYY-MM-DD` must be a real date.
pub(crate) fn parse_optional_date(raw: &str) -> Result<Option<DateTime<Utc>>, CommandError> {
    if raw.eq_ignore_ascii_case("today") || looks_like_date(raw) {
        parse_date(raw).map(Some)
    } else {
        Ok(None)
    }
}

fn looks_like_date(raw: &str) -> bool {
    let bytes = raw.trim().as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(idx, byte)| match idx {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

/// `[]` is the current month, `[month]` that month this year, `[month, year]` explicit.
/// Months are one-based as typed by users.
pub(crate) fn parse_period(args: &[&str]) -> Result<MonthPeriod, CommandError> {
    let current = MonthPeriod::current();
    let (month, year) = match args {
        [] => return Ok(current),
        [month] => (parse_number::<u32>(month, "month")?, current.year),
        [month, year] => (
            parse_number::<u32>(month, "month")?,
            parse_number::<i32>(year, "year")?,
        ),
        _ => {
            return Err(CommandError::InvalidArguments(
                "expected at most a month and a year".into(),
            ))
        }
    };
    MonthPeriod::from_human(month, year)
        .ok_or_else(|| CommandError::InvalidArguments(format!("month must be 1-12 (got {month})")))
}

fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, CommandError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid {what} `{raw}`")))
}

/// Reads `--amount`, `--category`, `--date` and `--note` flag pairs into a patch.
pub(crate) fn parse_patch(args: &[&str]) -> Result<ExpensePatch, CommandError> {
    let mut patch = ExpensePatch::default();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let value = iter.next().ok_or_else(|| {
            CommandError::InvalidArguments(format!("flag `{flag}` needs a value"))
        })?;
        match *flag {
            "--amount" => patch.amount = Some(parse_amount(value)?),
            "--category" => patch.category = Some(parse_category(value)?),
            "--date" => patch.date = Some(parse_date(value)?),
            "--note" => patch.note = Some((*value).to_string()),
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown flag `{other}`"
                )))
            }
        }
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_must_be_positive_number() {
        assert_eq!(parse_amount("12.50").unwrap(), 12.5);
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("NaN").is_err());
    }

    #[test]
    fn budget_amount_allows_zero() {
        assert_eq!(parse_budget_amount("0").unwrap(), 0.0);
        assert!(parse_budget_amount("-1").is_err());
    }

    #[test]
    fn period_accepts_one_based_months() {
        let period = parse_period(&["6", "2024"]).unwrap();
        assert_eq!(period, MonthPeriod::new(5, 2024).unwrap());
        assert!(parse_period(&["13", "2024"]).is_err());
        assert!(parse_period(&["0", "2024"]).is_err());
    }

    #[test]
    fn date_is_midnight_utc() {
        let date = parse_date("2024-02-29").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-02-29T00:00:00+00:00");
        assert!(parse_date("29/02/2024").is_err());
    }

    #[test]
    fn optional_date_rejects_impossible_dates() {
        assert!(parse_optional_date("2024-06-03").unwrap().is_some());
        assert!(parse_optional_date("Today").unwrap().is_some());
        assert!(parse_optional_date("lunch").unwrap().is_none());
        assert!(parse_optional_date("2024-13-01").is_err());
        assert!(parse_optional_date("2023-02-29").is_err());
    }

    #[test]
    fn patch_collects_only_given_flags() {
        let patch = parse_patch(&["--note", "taxi home", "--amount", "9"]).unwrap();
        assert_eq!(patch.amount, Some(9.0));
        assert_eq!(patch.note.as_deref(), Some("taxi home"));
        assert!(patch.category.is_none() && patch.date.is_none());
        assert!(parse_patch(&["--amount"]).is_err());
        assert!(parse_patch(&["--colour", "red"]).is_err());
    }
}
