use super::FinanceTracker;
use super::period::{first_of_month, month_bounds, month_label};
use crate::db::FinanceStore;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{DateRange, TrendPoint};
use chrono::{Datelike, Duration, Months, NaiveDate};

impl<S: FinanceStore + ?Sized> FinanceTracker<'_, S> {
    /// Total spend for `num_months` months, starting with the current month and
    /// stepping back.
    ///
    /// Each step goes back `i * 30` days from the first of the current month,
    /// so a short month can be skipped and, over long spans, a month can be hit
    /// twice. A month hit twice keeps its first position with the later total.
    pub fn get_spending_trend(&self, num_months: u32) -> FinanceResult<Vec<TrendPoint>> {
        let anchor = first_of_month(self.today());
        let mut trend: Vec<TrendPoint> = Vec::new();

        for i in 0..num_months {
            let approx = anchor
                .checked_sub_signed(Duration::days(i64::from(i) * 30))
                .ok_or_else(|| {
                    FinanceError::Validation(format!(
                        "Cannot go back {} months from {}",
                        num_months, anchor
                    ))
                })?;
            let (start, end) = month_bounds(approx.year(), approx.month())?;
            let total_spent = self.spent_in_range(DateRange::between(start, end))?;
            let label = month_label(start);

            match trend.iter_mut().find(|point| point.month_label == label) {
                Some(existing) => existing.total_spent = total_spent,
                None => trend.push(TrendPoint {
                    month_label: label,
                    total_spent,
                }),
            }
        }

        Ok(trend)
    }

    /// Total spend for every calendar month from the month of `start` to the
    /// month of `end`, oldest first.
    pub fn get_monthly_trend(&self, start: NaiveDate, end: NaiveDate) -> FinanceResult<Vec<TrendPoint>> {
        if start > end {
            return Err(FinanceError::Validation(
                "Start date must be before end date.".to_string(),
            ));
        }

        calendar_months(start, end)?
            .into_iter()
            .map(|first| -> FinanceResult<TrendPoint> {
                let (month_start, month_end) = month_bounds(first.year(), first.month())?;
                Ok(TrendPoint {
                    month_label: month_label(month_start),
                    total_spent: self.spent_in_range(DateRange::between(month_start, month_end))?,
                })
            })
            .collect()
    }

    /// Months covered by the transaction history as `("YYYY-MM", "March 2025")`,
    /// most recent first. Just the current month when there is no history.
    pub fn available_months(&self) -> FinanceResult<Vec<(String, String)>> {
        let months = match self.store.min_and_max_transaction_date()? {
            Some((min, max)) => calendar_months(min, max)?,
            None => vec![first_of_month(self.today())],
        };

        Ok(months
            .into_iter()
            .rev()
            .map(|first| (first.format("%Y-%m").to_string(), first.format("%B %Y").to_string()))
            .collect())
    }
}

/// First day of every month from the month of `start` to the month of `end`.
fn calendar_months(start: NaiveDate, end: NaiveDate) -> FinanceResult<Vec<NaiveDate>> {
    let last = first_of_month(end);
    let mut current = first_of_month(start);
    let mut months = Vec::new();

    while current <= last {
        months.push(current);
        current = current
            .checked_add_months(Months::new(1))
            .ok_or_else(|| FinanceError::MalformedDate {
                value: current.to_string(),
            })?;
    }
    Ok(months)
}

#[cfg(test)]
mod tests {
    use crate::analysis::FinanceTracker;
    use crate::analysis::test_support::*;
    use crate::db::connection::establish_test_connection;
    use crate::error::FinanceError;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn labels(trend: &[crate::models::TrendPoint]) -> Vec<&str> {
        trend.iter().map(|p| p.month_label.as_str()).collect()
    }

    #[test]
    fn test_spending_trend_sums_all_categories_per_month() {
        let conn = establish_test_connection().unwrap();
        spend(&conn, date(2025, 6, 1), "Groceries", "10");
        spend(&conn, date(2025, 6, 30), "Dining", "5.25");
        spend(&conn, date(2025, 5, 31), "Groceries", "7");
        spend(&conn, date(2025, 7, 1), "Groceries", "100");
        let tracker = FinanceTracker::with_clock(&conn, || date(2025, 6, 20));

        let trend = tracker.get_spending_trend(3).unwrap();

        assert_eq!(labels(&trend), vec!["Jun 2025", "May 2025", "Apr 2025"]);
        assert_eq!(trend[0].total_spent, dec("15.25"));
        assert_eq!(trend[1].total_spent, dec("7"));
        assert_eq!(trend[2].total_spent, Decimal::ZERO);
    }

    #[test]
    fn test_spending_trend_crosses_year_boundary() {
        let conn = establish_test_connection().unwrap();
        spend(&conn, date(2024, 12, 24), "Shopping", "80");
        let tracker = FinanceTracker::with_clock(&conn, || date(2025, 1, 5));

        let trend = tracker.get_spending_trend(2).unwrap();
        assert_eq!(labels(&trend), vec!["Jan 2025", "Dec 2024"]);
        assert_eq!(trend[1].total_spent, dec("80"));
    }

    #[test]
    fn test_spending_trend_thirty_day_steps_skip_short_february() {
        // Mar 1 minus 30 days lands in January, so February never appears.
        let conn = establish_test_connection().unwrap();
        spend(&conn, date(2025, 2, 10), "Groceries", "50");
        let tracker = FinanceTracker::with_clock(&conn, || date(2025, 3, 15));

        let trend = tracker.get_spending_trend(3).unwrap();
        assert_eq!(labels(&trend), vec!["Mar 2025", "Jan 2025", "Dec 2024"]);
        assert!(trend.iter().all(|p| p.total_spent.is_zero()));
    }

    #[test]
    fn test_spending_trend_month_hit_twice_keeps_first_position() {
        // Dec 31 and Dec 1 both fall in December; the later total wins and
        // only three buckets come back for four steps.
        let conn = establish_test_connection().unwrap();
        spend(&conn, date(2024, 12, 12), "Groceries", "42");
        spend(&conn, date(2025, 3, 2), "Dining", "8");
        let tracker = FinanceTracker::with_clock(&conn, || date(2025, 3, 15));

        let trend = tracker.get_spending_trend(4).unwrap();
        assert_eq!(trend.len(), 3);
        assert_eq!(labels(&trend), vec!["Mar 2025", "Jan 2025", "Dec 2024"]);
        assert_eq!(trend[0].total_spent, dec("8"));
        assert_eq!(trend[2].total_spent, dec("42"));
    }

    #[test]
    fn test_spending_trend_before_earliest_date_is_an_error() {
        let conn = establish_test_connection().unwrap();
        let tracker = FinanceTracker::with_clock(&conn, || chrono::NaiveDate::MIN);

        assert!(tracker.get_spending_trend(2).unwrap_err().is_validation());
        assert_eq!(tracker.get_spending_trend(1).unwrap().len(), 1);
    }

    #[test]
    fn test_spending_trend_zero_months() {
        let conn = establish_test_connection().unwrap();
        let tracker = FinanceTracker::with_clock(&conn, || date(2025, 3, 15));
        assert!(tracker.get_spending_trend(0).unwrap().is_empty());
    }

    #[test]
    fn test_spending_trend_store_failure() {
        let tracker = FinanceTracker::with_clock(&UnavailableStore, || date(2025, 3, 15));
        assert!(matches!(
            tracker.get_spending_trend(6),
            Err(FinanceError::DataAccess(_))
        ));
    }

    #[test]
    fn test_monthly_trend_is_exact_and_oldest_first() {
        let conn = establish_test_connection().unwrap();
        spend(&conn, date(2025, 2, 28), "Groceries", "20");
        spend(&conn, date(2025, 4, 1), "Groceries", "30");
        let tracker = FinanceTracker::with_clock(&conn, || date(2025, 6, 1));

        let trend = tracker.get_monthly_trend(date(2025, 1, 15), date(2025, 4, 2)).unwrap();
        assert_eq!(labels(&trend), vec!["Jan 2025", "Feb 2025", "Mar 2025", "Apr 2025"]);
        assert_eq!(trend[1].total_spent, dec("20"));
        assert_eq!(trend[3].total_spent, dec("30"));
    }

    #[test]
    fn test_monthly_trend_rejects_inverted_range() {
        let conn = establish_test_connection().unwrap();
        let tracker = FinanceTracker::with_clock(&conn, || date(2025, 6, 1));
        let result = tracker.get_monthly_trend(date(2025, 5, 1), date(2025, 4, 1));
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_available_months_most_recent_first() {
        let conn = establish_test_connection().unwrap();
        spend(&conn, date(2024, 11, 3), "Groceries", "1");
        spend(&conn, date(2025, 1, 20), "Groceries", "1");
        let tracker = FinanceTracker::with_clock(&conn, || date(2025, 6, 1));

        let months = tracker.available_months().unwrap();
        assert_eq!(
            months,
            vec![
                ("2025-01".to_string(), "January 2025".to_string()),
                ("2024-12".to_string(), "December 2024".to_string()),
                ("2024-11".to_string(), "November 2024".to_string()),
            ]
        );
    }

    #[test]
    fn test_available_months_empty_store_uses_current_month() {
        let conn = establish_test_connection().unwrap();
        let tracker = FinanceTracker::with_clock(&conn, || date(2025, 6, 18));
        assert_eq!(
            tracker.available_months().unwrap(),
            vec![("2025-06".to_string(), "June 2025".to_string())]
        );
    }
}
