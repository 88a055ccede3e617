//! Budget usage and spending trend analysis over a [`FinanceStore`].
//!
//! Nothing is cached: every call reads the store again, so a write is visible
//! to the next call.

pub mod budget;
pub mod period;
pub mod trend;

pub use period::Period;

use crate::db::FinanceStore;
use crate::error::FinanceResult;
use crate::models::DateRange;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

/// A period resolved to concrete dates and a budget multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPeriod {
    pub range: DateRange,
    pub multiplier: Decimal,
}

pub struct FinanceTracker<'a, S: FinanceStore + ?Sized> {
    store: &'a S,
    clock: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl<'a, S: FinanceStore + ?Sized> FinanceTracker<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self::with_clock(store, local_today)
    }

    /// Uses `clock` instead of the local date to anchor periods.
    pub fn with_clock(store: &'a S, clock: fn() -> NaiveDate) -> Self {
        Self { store, clock }
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    pub fn resolve(&self, period: Period) -> FinanceResult<ResolvedPeriod> {
        let range = period.date_range(self.today())?;
        let history = if period.needs_history() {
            self.store.min_and_max_transaction_date()?
        } else {
            None
        };
        let multiplier = period.budget_multiplier(history);
        debug!(%period, ?range, %multiplier, "resolved period");
        Ok(ResolvedPeriod { range, multiplier })
    }

    fn spent_in_range(&self, range: DateRange) -> FinanceResult<Decimal> {
        Ok(self
            .store
            .sum_amounts_by_category(range)?
            .into_iter()
            .map(|(_, amount)| amount)
            .sum())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::db::connection::establish_test_connection;
    use crate::error::FinanceError;

    #[test]
    fn test_resolve_uses_injected_clock() {
        let conn = establish_test_connection().unwrap();
        let tracker = FinanceTracker::with_clock(&conn, || date(2025, 1, 10));

        let resolved = tracker.resolve(Period::PreviousMonth).unwrap();
        assert_eq!(resolved.range, DateRange::between(date(2024, 12, 1), date(2024, 12, 31)));
        assert_eq!(resolved.multiplier, Decimal::ONE);
    }

    #[test]
    fn test_resolve_all_time_reads_history() {
        let conn = establish_test_connection().unwrap();
        spend(&conn, date(2025, 1, 5), "Food", "1");
        spend(&conn, date(2025, 3, 28), "Food", "1");
        let tracker = FinanceTracker::with_clock(&conn, || date(2025, 6, 1));

        let resolved = tracker.resolve(Period::AllTime).unwrap();
        assert!(resolved.range.is_unbounded());
        assert_eq!(resolved.multiplier, Decimal::from(3));
    }

    #[test]
    fn test_resolve_all_time_empty_store() {
        let conn = establish_test_connection().unwrap();
        let tracker = FinanceTracker::with_clock(&conn, || date(2025, 6, 1));
        assert_eq!(tracker.resolve(Period::AllTime).unwrap().multiplier, Decimal::ONE);
    }

    #[test]
    fn test_resolve_all_time_store_failure() {
        let tracker = FinanceTracker::with_clock(&UnavailableStore, || date(2025, 6, 1));
        assert!(matches!(
            tracker.resolve(Period::AllTime),
            Err(FinanceError::DataAccess(_))
        ));
        assert!(tracker.resolve(Period::CurrentMonth).is_ok());
    }
}
