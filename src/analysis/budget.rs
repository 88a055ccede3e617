use super::{FinanceTracker, Period};
use crate::db::FinanceStore;
use crate::error::FinanceResult;
use crate::models::BudgetUsageRecord;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

impl<S: FinanceStore + ?Sized> FinanceTracker<'_, S> {
    /// Spend against the scaled budget for every category, highest percentage
    /// first. Equal percentages are ordered by category name.
    ///
    /// The result always holds one record per category in the store, including
    /// categories with no spend in the period.
    pub fn calculate_budget_usage(&self, period: Period) -> FinanceResult<Vec<BudgetUsageRecord>> {
        let resolved = self.resolve(period)?;
        let spending: HashMap<String, Decimal> = self
            .store
            .sum_amounts_by_category(resolved.range)?
            .into_iter()
            .collect();
        let categories = self.store.list_categories()?;

        let mut usage: Vec<BudgetUsageRecord> = categories
            .into_iter()
            .map(|category| {
                let spent = spending.get(&category.name).copied().unwrap_or(Decimal::ZERO);
                let budget = category.monthly_budget * resolved.multiplier;
                BudgetUsageRecord::new(category.name, spent, budget)
            })
            .collect();

        usage.sort_by(|a, b| {
            b.percentage
                .cmp(&a.percentage)
                .then_with(|| a.category.cmp(&b.category))
        });

        debug!(%period, categories = usage.len(), "calculated budget usage");
        Ok(usage)
    }

    /// Categories whose spend exceeds 100% of the scaled budget.
    pub fn get_over_budget_categories(&self, period: Period) -> FinanceResult<Vec<BudgetUsageRecord>> {
        Ok(self
            .calculate_budget_usage(period)?
            .into_iter()
            .filter(BudgetUsageRecord::is_over_budget)
            .collect())
    }

    /// Raw spend per category in the period, largest first. Unlike
    /// [`calculate_budget_usage`](Self::calculate_budget_usage), categories
    /// without spend are left out.
    pub fn get_spending_by_category(&self, period: Period) -> FinanceResult<Vec<(String, Decimal)>> {
        let range = period.date_range(self.today())?;
        Ok(self
            .store
            .sum_amounts_by_category(range)?
            .into_iter()
            .filter(|(_, amount)| !amount.is_zero())
            .collect())
    }

    pub fn total_spent(&self, period: Period) -> FinanceResult<Decimal> {
        let range = period.date_range(self.today())?;
        self.spent_in_range(range)
    }
}
