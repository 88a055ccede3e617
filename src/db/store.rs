use crate::db::{category_repository, repository};
use crate::error::FinanceResult;
use crate::models::{Category, DateRange};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

/// Read access the analysis engine needs from a store.
pub trait FinanceStore {
    fn list_categories(&self) -> FinanceResult<Vec<Category>>;

    /// Per-category sums inside `range`, largest first, zero-spend categories omitted.
    fn sum_amounts_by_category(&self, range: DateRange) -> FinanceResult<Vec<(String, Decimal)>>;

    fn min_and_max_transaction_date(&self) -> FinanceResult<Option<(NaiveDate, NaiveDate)>>;
}

impl FinanceStore for Connection {
    fn list_categories(&self) -> FinanceResult<Vec<Category>> {
        category_repository::get_all_categories(self)
    }

    fn sum_amounts_by_category(&self, range: DateRange) -> FinanceResult<Vec<(String, Decimal)>> {
        repository::sum_amounts_by_category(self, range)
    }

    fn min_and_max_transaction_date(&self) -> FinanceResult<Option<(NaiveDate, NaiveDate)>> {
        repository::transaction_date_bounds(self)
    }
}
