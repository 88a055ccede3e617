//! Named aggregation windows and the budget scaling that goes with them.

use crate::error::{FinanceError, FinanceResult};
use crate::models::DateRange;
use chrono::{Datelike, Duration, Months, NaiveDate};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// A time window for aggregation, resolved against "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    CurrentMonth,
    PreviousMonth,
    CurrentYear,
    AllTime,
    /// A specific calendar month, e.g. "2025-03"
    Month { year: i32, month: u32 },
    /// Every transaction against the plain monthly budget. Produced by
    /// [`Period::lenient`] for tokens it does not recognise.
    Unrecognised,
}

impl Period {
    /// Parses a period token. Unrecognised tokens become
    /// [`Period::Unrecognised`]: no date bounds, budget not scaled.
    pub fn lenient(token: &str) -> Self {
        token.parse().unwrap_or_else(|err: FinanceError| {
            warn!(%err, "falling back to an unbounded period");
            Period::Unrecognised
        })
    }

    /// Inclusive date window for this period as seen on `today`.
    pub fn date_range(&self, today: NaiveDate) -> FinanceResult<DateRange> {
        match *self {
            Period::CurrentMonth => month_range(today.year(), today.month()),
            Period::PreviousMonth => {
                let last_of_previous = first_of_month(today) - Duration::days(1);
                month_range(last_of_previous.year(), last_of_previous.month())
            }
            Period::CurrentYear => {
                let (start, _) = month_bounds(today.year(), 1)?;
                let (_, end) = month_bounds(today.year(), 12)?;
                Ok(DateRange::between(start, end))
            }
            Period::AllTime | Period::Unrecognised => Ok(DateRange::unbounded()),
            Period::Month { year, month } => month_range(year, month),
        }
    }

    /// Whether the multiplier depends on the transaction history.
    pub fn needs_history(&self) -> bool {
        matches!(self, Period::AllTime)
    }

    /// Factor applied to a monthly budget to compare it with spend over this
    /// period. For all-time it is the number of calendar months touched by the
    /// history, at least 1.
    pub fn budget_multiplier(&self, history: Option<(NaiveDate, NaiveDate)>) -> Decimal {
        match self {
            Period::CurrentMonth
            | Period::PreviousMonth
            | Period::Month { .. }
            | Period::Unrecognised => Decimal::ONE,
            Period::CurrentYear => Decimal::from(12),
            Period::AllTime => history
                .map(|(min, max)| Decimal::from(months_spanned(min, max).max(1)))
                .unwrap_or(Decimal::ONE),
        }
    }

    /// Human readable description, e.g. for report titles.
    pub fn describe(&self) -> String {
        match self {
            Period::CurrentMonth => "This month".to_string(),
            Period::PreviousMonth => "Previous month".to_string(),
            Period::CurrentYear => "This year".to_string(),
            Period::AllTime => "All time".to_string(),
            Period::Unrecognised => "All transactions".to_string(),
            Period::Month { year, month } => match NaiveDate::from_ymd_opt(*year, *month, 1) {
                Some(first) => first.format("%B %Y").to_string(),
                None => self.to_string(),
            },
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::CurrentMonth => f.write_str("current_month"),
            Period::PreviousMonth => f.write_str("previous_month"),
            Period::CurrentYear => f.write_str("current_year"),
            Period::AllTime => f.write_str("all_time"),
            Period::Unrecognised => f.write_str("unrecognised"),
            Period::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
        }
    }
}

impl FromStr for Period {
    type Err = FinanceError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim().to_lowercase().as_str() {
            "month" | "current_month" => Ok(Period::CurrentMonth),
            "prev_month" | "previous_month" => Ok(Period::PreviousMonth),
            "year" | "current_year" => Ok(Period::CurrentYear),
            "all" | "all_time" => Ok(Period::AllTime),
            other => parse_year_month(other)
                .ok_or_else(|| FinanceError::InvalidPeriodToken(token.to_string())),
        }
    }
}

fn parse_year_month(token: &str) -> Option<Period> {
    let (year, month) = token.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(Period::Month { year, month })
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// First and last day of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> FinanceResult<(NaiveDate, NaiveDate)> {
    let malformed = || FinanceError::MalformedDate {
        value: format!("{:04}-{:02}-01", year, month),
    };
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(malformed)?;
    let end = start
        .checked_add_months(Months::new(1))
        .map(|next| next - Duration::days(1))
        .ok_or_else(malformed)?;
    Ok((start, end))
}

fn month_range(year: i32, month: u32) -> FinanceResult<DateRange> {
    let (start, end) = month_bounds(year, month)?;
    Ok(DateRange::between(start, end))
}

/// Calendar months from `min` to `max` inclusive, counting partial months.
pub fn months_spanned(min: NaiveDate, max: NaiveDate) -> i64 {
    let index = |date: NaiveDate| i64::from(date.year()) * 12 + i64::from(date.month());
    index(max) - index(min) + 1
}

/// "Mon YYYY" label used for trend buckets.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}
